//! Storage traits for pluggable lookup-cache implementations
//!
//! The cache is an optimization, never a source of truth: callers treat
//! every error here as recoverable and fall through to a fresh lookup.

use async_trait::async_trait;
use thiserror::Error;

use crate::lookups::CachedLookup;
use crate::models::Plate;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("Item not found: {id}")]
	NotFound { id: String },
	#[error("Connection error: {message}")]
	Connection { message: String },
	#[error("Serialization error: {message}")]
	Serialization { message: String },
	#[error("Storage operation failed: {message}")]
	Operation { message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Statistics about storage usage
#[derive(Debug, Clone)]
pub struct StorageStats {
	pub total_lookups: usize,
	pub fresh_lookups: usize,
}

/// Trait for lookup-cache storage operations
#[async_trait]
pub trait LookupStorage: Send + Sync {
	/// Get the cached lookup for a plate
	///
	/// Returns `None` when no record exists or the stored record has aged
	/// past the store's time-to-live; stale records are dropped on read.
	async fn get_lookup(&self, plate: &Plate) -> StorageResult<Option<CachedLookup>>;

	/// Store the lookup for a plate, replacing any existing record
	///
	/// The replace is atomic per plate, so the store never holds zero or two
	/// records for a plate mid-write. Returns the stored record's id.
	async fn put_lookup(&self, lookup: CachedLookup) -> StorageResult<String>;

	/// Delete the cached lookup for a plate, returning whether one existed
	async fn clear_lookup(&self, plate: &Plate) -> StorageResult<bool>;

	/// Number of records currently stored, fresh or stale
	async fn lookup_count(&self) -> StorageResult<usize>;

	/// Health check for the storage system
	async fn health_check(&self) -> StorageResult<bool>;

	/// Get overall storage statistics
	async fn stats(&self) -> StorageResult<StorageStats>;

	/// Close the storage connection
	async fn close(&self) -> StorageResult<()>;

	/// Start any background tasks associated with the storage implementation
	/// (e.g., TTL cleanup). Default implementation does nothing.
	async fn start_background_tasks(&self) -> StorageResult<()> {
		Ok(())
	}
}
