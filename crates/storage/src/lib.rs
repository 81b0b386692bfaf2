//! VRM Storage
//!
//! Lookup-cache storage for the vehicle data enrichment service. The cache
//! holds the last merged record per plate behind a TTL; it is best-effort
//! and never a source of truth.

pub mod memory_store;
pub mod traits;

pub use memory_store::MemoryStore;
pub use traits::Storage;
