//! Vehicle registration plate handling
//!
//! Plates are stored normalized: uppercase with all whitespace removed.
//! Every lookup, cache key, and provider call goes through this type so the
//! same vehicle can never end up under two differently-spelled keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum plate length after normalization. UK registrations are at most
/// seven characters; the headroom covers trade and diplomatic formats.
const MAX_PLATE_LEN: usize = 10;

/// Validation errors for registration plates
#[derive(Debug, Error, PartialEq)]
pub enum PlateError {
	#[error("Registration plate is empty")]
	Empty,

	#[error("Registration plate '{plate}' exceeds {max} characters")]
	TooLong { plate: String, max: usize },

	#[error("Registration plate '{plate}' contains invalid character '{character}'")]
	InvalidCharacter { plate: String, character: char },
}

/// A normalized vehicle registration plate
///
/// Construct via [`Plate::parse`]; the inner string is guaranteed uppercase,
/// whitespace-free, and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plate(String);

impl Plate {
	/// Parse and normalize a raw registration string
	pub fn parse(raw: &str) -> Result<Self, PlateError> {
		let normalized: String = raw
			.chars()
			.filter(|c| !c.is_whitespace())
			.map(|c| c.to_ascii_uppercase())
			.collect();

		if normalized.is_empty() {
			return Err(PlateError::Empty);
		}

		if normalized.len() > MAX_PLATE_LEN {
			return Err(PlateError::TooLong {
				plate: normalized,
				max: MAX_PLATE_LEN,
			});
		}

		if let Some(invalid) = normalized.chars().find(|c| !c.is_ascii_alphanumeric()) {
			return Err(PlateError::InvalidCharacter {
				plate: normalized.clone(),
				character: invalid,
			});
		}

		Ok(Self(normalized))
	}

	/// The normalized plate string
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Plate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl AsRef<str> for Plate {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_normalizes_case_and_whitespace() {
		let plate = Plate::parse("ab12 cde").unwrap();
		assert_eq!(plate.as_str(), "AB12CDE");

		let plate = Plate::parse("  AB12  CDE  ").unwrap();
		assert_eq!(plate.as_str(), "AB12CDE");
	}

	#[test]
	fn test_parse_rejects_empty() {
		assert_eq!(Plate::parse(""), Err(PlateError::Empty));
		assert_eq!(Plate::parse("   "), Err(PlateError::Empty));
	}

	#[test]
	fn test_parse_rejects_symbols() {
		let err = Plate::parse("AB12-CDE").unwrap_err();
		assert!(matches!(err, PlateError::InvalidCharacter { character: '-', .. }));
	}

	#[test]
	fn test_parse_rejects_overlong() {
		let err = Plate::parse("ABCDEFGHIJK").unwrap_err();
		assert!(matches!(err, PlateError::TooLong { .. }));
	}

	#[test]
	fn test_serde_is_transparent() {
		let plate = Plate::parse("AB12CDE").unwrap();
		let json = serde_json::to_string(&plate).unwrap();
		assert_eq!(json, "\"AB12CDE\"");

		let back: Plate = serde_json::from_str(&json).unwrap();
		assert_eq!(back, plate);
	}
}
