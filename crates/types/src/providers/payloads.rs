//! Raw payload models for the two upstream providers
//!
//! These mirror each provider's own wire schema and are never persisted
//! directly; the merger reduces them to a canonical record. A missing
//! optional sub-resource (for example a vehicle with no MOT record yet) is
//! represented as `None`/empty, not as an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Vehicle attributes resource from the spec/history provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
	pub make: Option<String>,
	pub model: Option<String>,
	pub variant: Option<String>,
	pub colour: Option<String>,
	pub fuel_type: Option<String>,
	pub transmission: Option<String>,
	pub body_style: Option<String>,
	pub engine_capacity_cc: Option<u32>,
	pub doors: Option<u8>,
	pub seats: Option<u8>,
	pub year_of_manufacture: Option<u16>,
	pub co2_g_km: Option<u32>,
	/// Annual vehicle excise duty in whole pounds
	pub annual_ved_gbp: Option<u32>,
	pub insurance_group: Option<String>,
	pub mpg_urban: Option<f64>,
	pub mpg_extra_urban: Option<f64>,
	pub mpg_combined: Option<f64>,
	/// Last odometer reading known to the provider
	pub recorded_mileage: Option<u32>,
}

/// Ownership / write-off / finance history resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
	pub previous_keepers: Option<u32>,
	pub written_off: Option<bool>,
	pub write_off_category: Option<String>,
	pub scrapped: Option<bool>,
	pub stolen: Option<bool>,
	pub outstanding_finance: Option<bool>,
	pub exported: Option<bool>,
	#[serde(default)]
	pub keeper_changes: Vec<KeeperChange>,
}

/// One change of registered keeper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeeperChange {
	pub date: NaiveDate,
	pub mileage: Option<u32>,
}

/// MOT test history resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotRecord {
	#[serde(default)]
	pub tests: Vec<MotTestEntry>,
}

/// A single MOT test as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotTestEntry {
	pub completed_date: NaiveDate,
	pub result: String,
	pub expiry_date: Option<NaiveDate>,
	pub odometer_miles: Option<u32>,
	#[serde(default)]
	pub advisories: Vec<String>,
}

/// Combined result of one spec/history provider lookup
///
/// The provider exposes three logically separate resources; any subset may
/// be absent when its sub-call failed or returned no data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecPayload {
	pub details: Option<VehicleDetails>,
	pub history: Option<HistoryRecord>,
	pub mot: Option<MotRecord>,
}

impl SpecPayload {
	/// Best mileage figure this payload can offer: the provider's recorded
	/// odometer reading, else the most recent MOT test reading.
	pub fn latest_mileage(&self) -> Option<u32> {
		if let Some(mileage) = self.details.as_ref().and_then(|d| d.recorded_mileage) {
			return Some(mileage);
		}

		self.mot.as_ref().and_then(|mot| {
			mot.tests
				.iter()
				.max_by_key(|t| t.completed_date)
				.and_then(|t| t.odometer_miles)
		})
	}
}

/// Price points returned by the valuation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedValue {
	#[serde(rename = "private")]
	pub private_sale: u32,
	pub retail: u32,
	pub trade: u32,
}

/// Payload from the valuation provider for one (plate, mileage) pair
///
/// The provider echoes its own description of the vehicle alongside the
/// prices; those fields participate in the merge at lower precedence than
/// the spec/history payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPayload {
	pub make: Option<String>,
	pub model: Option<String>,
	pub colour: Option<String>,
	pub fuel_type: Option<String>,
	/// Mileage figure the valuation was computed against
	pub mileage_used: Option<u32>,
	pub estimated_value: EstimatedValue,
	pub confidence: Option<f64>,
}
