//! Storage traits for pluggable lookup-cache implementations

pub mod traits;

pub use traits::{LookupStorage, StorageError, StorageResult, StorageStats};
