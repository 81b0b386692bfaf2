//! Upstream provider payloads, errors, and trait seams

pub mod errors;
pub mod payloads;
pub mod traits;

pub use errors::{ProviderError, ProviderResult};
pub use payloads::{
	EstimatedValue, HistoryRecord, KeeperChange, MotRecord, MotTestEntry, SpecPayload,
	ValuationPayload, VehicleDetails,
};
pub use traits::{SpecHistoryProvider, ValuationProvider};
