//! VRM Service
//!
//! Core logic for vehicle data reconciliation: the pure payload merger and
//! the enrichment orchestrator that coordinates providers and the cache.

pub mod enrichment;
pub mod merge;

pub use enrichment::{
	EnrichedLookup, EnrichmentError, EnrichmentResult, EnrichmentService, EnrichmentStats,
};
pub use merge::merge_payloads;
