//! Trait seams for upstream provider clients
//!
//! The orchestrator depends only on these traits; HTTP implementations live
//! in the providers crate and mock implementations beside the tests.

use async_trait::async_trait;

use super::errors::ProviderResult;
use super::payloads::{SpecPayload, ValuationPayload};
use crate::models::Plate;

/// Client for the vehicle specification / history provider
#[async_trait]
pub trait SpecHistoryProvider: Send + Sync {
	/// Stable identifier for this provider, used as the source tag
	fn provider_id(&self) -> &str;

	/// Fetch vehicle details, ownership history, and MOT history for a plate
	///
	/// The three underlying resources are fetched independently; a missing
	/// optional resource leaves its section `None`. A failure on the core
	/// vehicle-details resource fails the whole call.
	async fn fetch(&self, plate: &Plate) -> ProviderResult<SpecPayload>;

	/// Lightweight reachability probe
	async fn health_check(&self) -> ProviderResult<bool>;
}

/// Client for the trade valuation provider
#[async_trait]
pub trait ValuationProvider: Send + Sync {
	/// Stable identifier for this provider, used as the source tag
	fn provider_id(&self) -> &str;

	/// Fetch price points for a plate at the given mileage
	///
	/// Mileage must be positive; callers derive an estimate when the true
	/// figure is unknown.
	async fn fetch(&self, plate: &Plate, mileage: u32) -> ProviderResult<ValuationPayload>;

	/// Lightweight reachability probe
	async fn health_check(&self) -> ProviderResult<bool>;
}
