//! Storage traits for pluggable storage implementations

// Re-export the storage traits from the types crate
pub use vrm_types::storage::{
	LookupStorage as Storage, StorageError, StorageResult, StorageStats,
};
