//! VRM Types
//!
//! Shared models and traits for the vehicle data enrichment service.
//! This crate contains all domain models organized by business entity.

pub mod lookups;
pub mod models;
pub mod providers;
pub mod storage;
pub mod vehicle;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

// Re-export commonly used types for convenience
pub use models::{Plate, PlateError, SecretString};

pub use vehicle::{
	CanonicalVehicleRecord, DataSource, FuelEconomy, MileageReading, MotTest, Sourced,
	ValuationFigures,
};

pub use providers::{
	EstimatedValue, HistoryRecord, MotRecord, MotTestEntry, ProviderError, ProviderResult,
	SpecHistoryProvider, SpecPayload, ValuationPayload, ValuationProvider, VehicleDetails,
};

pub use lookups::{CachedLookup, CheckStatus};

pub use storage::{LookupStorage, StorageError, StorageResult, StorageStats};
