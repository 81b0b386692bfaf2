//! Mock providers for examples and testing
//!
//! Simple, working mock implementations of the provider traits that can be
//! used in examples and tests without touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use vrm_types::{
	EstimatedValue, HistoryRecord, MotRecord, MotTestEntry, Plate, ProviderError, ProviderResult,
	SpecHistoryProvider, SpecPayload, ValuationPayload, ValuationProvider, VehicleDetails,
};

/// Mock spec/history provider with configurable delay and failure
#[derive(Debug, Clone)]
pub struct MockSpecProvider {
	pub should_fail: bool,
	pub response_delay_ms: u64,
	call_tracker: Arc<AtomicUsize>,
}

impl MockSpecProvider {
	/// A provider that answers immediately with a full payload
	pub fn new() -> Self {
		Self {
			should_fail: false,
			response_delay_ms: 0,
			call_tracker: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// A provider whose every call fails with an upstream error
	pub fn failing() -> Self {
		Self {
			should_fail: true,
			..Self::new()
		}
	}

	/// A provider that sleeps before answering (timeout testing)
	pub fn slow(delay_ms: u64) -> Self {
		Self {
			response_delay_ms: delay_ms,
			..Self::new()
		}
	}

	/// Number of times this provider has been called
	pub fn call_count(&self) -> usize {
		self.call_tracker.load(Ordering::Relaxed)
	}
}

impl Default for MockSpecProvider {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl SpecHistoryProvider for MockSpecProvider {
	fn provider_id(&self) -> &str {
		"spec-history-v1"
	}

	async fn fetch(&self, plate: &Plate) -> ProviderResult<SpecPayload> {
		self.call_tracker.fetch_add(1, Ordering::Relaxed);

		if self.response_delay_ms > 0 {
			tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
		}

		if self.should_fail {
			return Err(ProviderError::from_status(
				self.provider_id(),
				plate.as_str(),
				503,
			));
		}

		Ok(SpecPayload {
			details: Some(VehicleDetails {
				make: Some("BMW".to_string()),
				model: Some("3 Series".to_string()),
				variant: Some("320d M Sport".to_string()),
				colour: Some("Black".to_string()),
				fuel_type: Some("Diesel".to_string()),
				transmission: Some("Manual".to_string()),
				body_style: Some("Saloon".to_string()),
				engine_capacity_cc: Some(1995),
				doors: Some(4),
				seats: Some(5),
				year_of_manufacture: Some(2019),
				co2_g_km: Some(110),
				annual_ved_gbp: Some(150),
				insurance_group: Some("29E".to_string()),
				mpg_urban: Some(52.3),
				mpg_extra_urban: Some(67.3),
				mpg_combined: Some(60.1),
				recorded_mileage: Some(48000),
			}),
			history: Some(HistoryRecord {
				previous_keepers: Some(2),
				written_off: Some(false),
				write_off_category: None,
				scrapped: Some(false),
				stolen: Some(false),
				outstanding_finance: Some(false),
				exported: Some(false),
				keeper_changes: vec![],
			}),
			mot: Some(MotRecord {
				tests: vec![MotTestEntry {
					completed_date: "2025-02-14".parse().unwrap(),
					result: "PASSED".to_string(),
					expiry_date: Some("2026-02-13".parse().unwrap()),
					odometer_miles: Some(47200),
					advisories: vec!["Front tyres wearing unevenly".to_string()],
				}],
			}),
		})
	}

	async fn health_check(&self) -> ProviderResult<bool> {
		Ok(!self.should_fail)
	}
}

/// Mock valuation provider with configurable delay and failure
#[derive(Debug, Clone)]
pub struct MockValuationProvider {
	pub should_fail: bool,
	pub response_delay_ms: u64,
	call_tracker: Arc<AtomicUsize>,
}

impl MockValuationProvider {
	/// A provider that answers immediately with fixed price points
	pub fn new() -> Self {
		Self {
			should_fail: false,
			response_delay_ms: 0,
			call_tracker: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// A provider whose every call fails with a rate-limit error
	pub fn failing() -> Self {
		Self {
			should_fail: true,
			..Self::new()
		}
	}

	/// A provider that sleeps before answering (timeout testing)
	pub fn slow(delay_ms: u64) -> Self {
		Self {
			response_delay_ms: delay_ms,
			..Self::new()
		}
	}

	/// Number of times this provider has been called
	pub fn call_count(&self) -> usize {
		self.call_tracker.load(Ordering::Relaxed)
	}
}

impl Default for MockValuationProvider {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl ValuationProvider for MockValuationProvider {
	fn provider_id(&self) -> &str {
		"valuation-v1"
	}

	async fn fetch(&self, plate: &Plate, mileage: u32) -> ProviderResult<ValuationPayload> {
		self.call_tracker.fetch_add(1, Ordering::Relaxed);

		if self.response_delay_ms > 0 {
			tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
		}

		if self.should_fail {
			return Err(ProviderError::from_status(
				self.provider_id(),
				plate.as_str(),
				429,
			));
		}

		Ok(ValuationPayload {
			make: Some("BMW".to_string()),
			model: Some("3 SERIES".to_string()),
			colour: None,
			fuel_type: None,
			mileage_used: Some(mileage),
			estimated_value: EstimatedValue {
				private_sale: 12000,
				retail: 14000,
				trade: 10500,
			},
			confidence: Some(0.85),
		})
	}

	async fn health_check(&self) -> ProviderResult<bool> {
		Ok(!self.should_fail)
	}
}
