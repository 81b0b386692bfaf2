//! VRM Providers
//!
//! HTTP clients for the upstream vehicle data providers: the vehicle
//! specification / history provider and the trade valuation provider.

pub mod client;
pub mod spec_client;
pub mod valuation_client;

pub use spec_client::HttpSpecClient;
pub use valuation_client::HttpValuationClient;
pub use vrm_types::{ProviderError, ProviderResult, SpecHistoryProvider, ValuationProvider};

/// Source identifier for the spec/history provider
pub const SPEC_PROVIDER_ID: &str = "spec-history-v1";

/// Source identifier for the valuation provider
pub const VALUATION_PROVIDER_ID: &str = "valuation-v1";
