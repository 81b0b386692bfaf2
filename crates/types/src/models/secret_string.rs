//! Secure string handling for provider API keys
//!
//! This module provides a `SecretString` type that uses zeroize to securely
//! clear sensitive data from memory when dropped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string type that zeroizes its contents when dropped
///
/// Holds sensitive data such as upstream provider API keys. The underlying
/// string data is automatically cleared from memory when the `SecretString`
/// is dropped, and Debug/Display output is always redacted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
	inner: String,
}

impl SecretString {
	/// Create a new `SecretString` from a `String`
	pub fn new(secret: String) -> Self {
		Self { inner: secret }
	}

	/// Create a new `SecretString` from a string slice
	pub fn from_str(secret: &str) -> Self {
		Self::new(secret.to_string())
	}

	/// Expose the secret value
	///
	/// Use this method sparingly and only when you need access to the actual
	/// secret value, e.g. when building an authorization header.
	pub fn expose_secret(&self) -> &str {
		&self.inner
	}

	/// Get the length of the secret without exposing it
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Check if the secret is empty without exposing it
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

// Drop implementation is automatically provided by ZeroizeOnDrop derive

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SecretString")
			.field("inner", &"[REDACTED]")
			.finish()
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[REDACTED]")
	}
}

impl From<String> for SecretString {
	fn from(secret: String) -> Self {
		Self::new(secret)
	}
}

impl From<&str> for SecretString {
	fn from(secret: &str) -> Self {
		Self::from_str(secret)
	}
}

impl Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.inner.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		Ok(Self::new(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_secret_access() {
		let secret = SecretString::from_str("provider-api-key-12345");
		assert_eq!(secret.expose_secret(), "provider-api-key-12345");
		assert_eq!(secret.len(), 22);
		assert!(!secret.is_empty());
	}

	#[test]
	fn test_debug_and_display_are_redacted() {
		let secret = SecretString::from_str("do-not-log-me");
		assert!(!format!("{:?}", secret).contains("do-not-log-me"));
		assert_eq!(format!("{}", secret), "[REDACTED]");
	}
}
