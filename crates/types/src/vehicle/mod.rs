//! Canonical vehicle record with per-field source tagging
//!
//! The canonical record is the single merged view of one vehicle at one
//! point in time. Every populated field carries exactly one [`DataSource`]
//! tag naming the upstream payload that supplied it. Records are built
//! fresh on every enrichment run and never mutated afterwards; a newer run
//! supersedes the previous record wholesale.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Plate;

/// Identifier for the origin of a canonical field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSource {
	/// The vehicle specification / history provider
	#[serde(rename = "spec-history-v1")]
	SpecHistory,
	/// The trade valuation provider
	#[serde(rename = "valuation-v1")]
	Valuation,
	/// Value produced by an explicit business rule, not an upstream payload
	Derived,
}

impl DataSource {
	/// Stable identifier used in persisted records and API responses
	pub fn as_str(&self) -> &'static str {
		match self {
			DataSource::SpecHistory => "spec-history-v1",
			DataSource::Valuation => "valuation-v1",
			DataSource::Derived => "derived",
		}
	}
}

impl std::fmt::Display for DataSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A field value paired with the source that supplied it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
	pub value: T,
	pub source: DataSource,
}

impl<T> Sourced<T> {
	pub fn new(value: T, source: DataSource) -> Self {
		Self { value, source }
	}

	/// Tag a value as supplied by the spec/history provider
	pub fn spec(value: T) -> Self {
		Self::new(value, DataSource::SpecHistory)
	}

	/// Tag a value as supplied by the valuation provider
	pub fn valuation(value: T) -> Self {
		Self::new(value, DataSource::Valuation)
	}

	/// Tag a value as produced by a business rule
	pub fn derived(value: T) -> Self {
		Self::new(value, DataSource::Derived)
	}
}

/// Fuel economy figures in miles per gallon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEconomy {
	pub urban_mpg: Option<f64>,
	pub extra_urban_mpg: Option<f64>,
	pub combined_mpg: Option<f64>,
}

impl FuelEconomy {
	pub fn is_empty(&self) -> bool {
		self.urban_mpg.is_none() && self.extra_urban_mpg.is_none() && self.combined_mpg.is_none()
	}
}

/// Valuation price points in whole pounds sterling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationFigures {
	/// Private sale estimate
	pub private_sale: u32,
	/// Dealer retail estimate
	pub retail: u32,
	/// Trade-in estimate
	pub trade: u32,
	/// Provider confidence indicator (0.0 to 1.0), if reported
	pub confidence: Option<f64>,
}

/// A single MOT test result in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotTest {
	pub completed_date: NaiveDate,
	pub result: String,
	pub expiry_date: Option<NaiveDate>,
	pub odometer_miles: Option<u32>,
	#[serde(default)]
	pub advisories: Vec<String>,
}

/// One odometer reading in the vehicle's mileage history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageReading {
	pub recorded_at: NaiveDate,
	pub mileage: u32,
}

/// The merged, source-tagged view of one vehicle
///
/// Fields absent from every consulted payload stay `None`; they are never
/// defaulted except by explicit, named business rules in the merger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalVehicleRecord {
	pub plate: Plate,

	// Identity
	#[serde(skip_serializing_if = "Option::is_none")]
	pub make: Option<Sourced<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub model: Option<Sourced<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub variant: Option<Sourced<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub colour: Option<Sourced<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub body_type: Option<Sourced<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub year_of_manufacture: Option<Sourced<u16>>,

	// Drivetrain
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fuel_type: Option<Sourced<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub transmission: Option<Sourced<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub engine_size_cc: Option<Sourced<u32>>,

	// Dimensions
	#[serde(skip_serializing_if = "Option::is_none")]
	pub door_count: Option<Sourced<u8>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub seat_count: Option<Sourced<u8>>,

	// Running costs
	#[serde(skip_serializing_if = "Option::is_none")]
	pub co2_emissions: Option<Sourced<u32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub annual_tax: Option<Sourced<u32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub insurance_group: Option<Sourced<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fuel_economy: Option<Sourced<FuelEconomy>>,

	// Valuation
	#[serde(skip_serializing_if = "Option::is_none")]
	pub valuation: Option<Sourced<ValuationFigures>>,

	// History
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mot_history: Option<Sourced<Vec<MotTest>>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mileage_history: Option<Sourced<Vec<MileageReading>>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub previous_owners: Option<Sourced<u32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub written_off: Option<Sourced<bool>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scrapped: Option<Sourced<bool>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stolen: Option<Sourced<bool>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub outstanding_finance: Option<Sourced<bool>>,
}

impl CanonicalVehicleRecord {
	/// Create a structurally valid record with every semantic field absent
	pub fn empty(plate: Plate) -> Self {
		Self {
			plate,
			make: None,
			model: None,
			variant: None,
			colour: None,
			body_type: None,
			year_of_manufacture: None,
			fuel_type: None,
			transmission: None,
			engine_size_cc: None,
			door_count: None,
			seat_count: None,
			co2_emissions: None,
			annual_tax: None,
			insurance_group: None,
			fuel_economy: None,
			valuation: None,
			mot_history: None,
			mileage_history: None,
			previous_owners: None,
			written_off: None,
			scrapped: None,
			stolen: None,
			outstanding_finance: None,
		}
	}

	/// True when no semantic field is populated
	pub fn is_empty(&self) -> bool {
		self.populated_fields() == 0
	}

	/// Number of populated semantic fields
	pub fn populated_fields(&self) -> usize {
		let mut count = 0;
		count += self.make.is_some() as usize;
		count += self.model.is_some() as usize;
		count += self.variant.is_some() as usize;
		count += self.colour.is_some() as usize;
		count += self.body_type.is_some() as usize;
		count += self.year_of_manufacture.is_some() as usize;
		count += self.fuel_type.is_some() as usize;
		count += self.transmission.is_some() as usize;
		count += self.engine_size_cc.is_some() as usize;
		count += self.door_count.is_some() as usize;
		count += self.seat_count.is_some() as usize;
		count += self.co2_emissions.is_some() as usize;
		count += self.annual_tax.is_some() as usize;
		count += self.insurance_group.is_some() as usize;
		count += self.fuel_economy.is_some() as usize;
		count += self.valuation.is_some() as usize;
		count += self.mot_history.is_some() as usize;
		count += self.mileage_history.is_some() as usize;
		count += self.previous_owners.is_some() as usize;
		count += self.written_off.is_some() as usize;
		count += self.scrapped.is_some() as usize;
		count += self.stolen.is_some() as usize;
		count += self.outstanding_finance.is_some() as usize;
		count
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_record_has_no_fields() {
		let record = CanonicalVehicleRecord::empty(Plate::parse("AB12CDE").unwrap());
		assert!(record.is_empty());
		assert_eq!(record.populated_fields(), 0);
	}

	#[test]
	fn test_sourced_constructors() {
		let make = Sourced::spec("BMW".to_string());
		assert_eq!(make.source, DataSource::SpecHistory);

		let value = Sourced::valuation(12000u32);
		assert_eq!(value.source, DataSource::Valuation);

		let co2 = Sourced::derived(0u32);
		assert_eq!(co2.source, DataSource::Derived);
	}

	#[test]
	fn test_data_source_serialization() {
		assert_eq!(
			serde_json::to_string(&DataSource::SpecHistory).unwrap(),
			"\"spec-history-v1\""
		);
		assert_eq!(
			serde_json::to_string(&DataSource::Valuation).unwrap(),
			"\"valuation-v1\""
		);
		assert_eq!(serde_json::to_string(&DataSource::Derived).unwrap(), "\"derived\"");
	}

	#[test]
	fn test_record_round_trips_through_json() {
		let mut record = CanonicalVehicleRecord::empty(Plate::parse("AB12CDE").unwrap());
		record.make = Some(Sourced::spec("BMW".to_string()));
		record.valuation = Some(Sourced::valuation(ValuationFigures {
			private_sale: 12000,
			retail: 14000,
			trade: 10500,
			confidence: Some(0.9),
		}));

		let json = serde_json::to_string(&record).unwrap();
		let back: CanonicalVehicleRecord = serde_json::from_str(&json).unwrap();
		assert_eq!(back, record);
	}
}
