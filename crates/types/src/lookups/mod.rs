//! Persisted lookup records for the vehicle-data cache

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vehicle::{CanonicalVehicleRecord, DataSource};

/// Outcome classification of one enrichment run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
	/// Every consulted provider responded
	Complete,
	/// At least one provider responded, at least one failed
	Partial,
	/// No provider responded; the record carries no semantic fields
	Empty,
}

impl CheckStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			CheckStatus::Complete => "complete",
			CheckStatus::Partial => "partial",
			CheckStatus::Empty => "empty",
		}
	}
}

/// The cached result of the last enrichment run for one plate
///
/// At most one record exists per plate. The flat summary columns exist for
/// cheap listing queries; `record` carries the full source-tagged structure
/// so a cache hit loses no fidelity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLookup {
	/// Unique identifier for this lookup run
	pub id: String,

	/// Normalized registration plate (unique key)
	pub plate: String,

	// Flat summary of the record for listing queries
	pub make: Option<String>,
	pub model: Option<String>,
	pub colour: Option<String>,
	pub fuel_type: Option<String>,

	/// Outcome of the run that produced this record
	pub status: CheckStatus,

	/// Sources that responded successfully during the run
	pub sources: Vec<DataSource>,

	/// Whether the run used provider sandbox endpoints
	pub test_mode: bool,

	/// When the enrichment run completed
	pub checked_at: DateTime<Utc>,

	/// The full source-tagged record
	pub record: CanonicalVehicleRecord,
}

impl CachedLookup {
	/// Build a cache record from a freshly merged canonical record
	pub fn new(
		record: CanonicalVehicleRecord,
		status: CheckStatus,
		sources: Vec<DataSource>,
		test_mode: bool,
	) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			plate: record.plate.as_str().to_string(),
			make: record.make.as_ref().map(|s| s.value.clone()),
			model: record.model.as_ref().map(|s| s.value.clone()),
			colour: record.colour.as_ref().map(|s| s.value.clone()),
			fuel_type: record.fuel_type.as_ref().map(|s| s.value.clone()),
			status,
			sources,
			test_mode,
			checked_at: Utc::now(),
			record,
		}
	}

	/// True when the record is older than the given time-to-live
	///
	/// A record aged exactly at the TTL still counts as fresh; only strictly
	/// older records are stale.
	pub fn is_stale(&self, ttl: Duration) -> bool {
		Utc::now().signed_duration_since(self.checked_at) > ttl
	}
}
