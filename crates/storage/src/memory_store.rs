//! In-memory lookup cache using DashMap with TTL support

use crate::traits::{Storage, StorageResult, StorageStats};
use async_trait::async_trait;
use chrono::Duration;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::time::interval;
use tracing::{debug, info};
use vrm_types::{CachedLookup, Plate};

/// Default time-to-live for cached lookups: 30 days
pub const DEFAULT_TTL_DAYS: i64 = 30;

/// Default interval between background sweeps of stale records
const CLEANUP_INTERVAL_SECS: u64 = 3600;

/// In-memory lookup cache keyed by normalized plate
///
/// The map holds at most one record per plate by construction: `put_lookup`
/// is a single atomic keyed insert, never a delete-then-insert, so a plate
/// can never transiently hold zero or two records during a write.
#[derive(Clone)]
pub struct MemoryStore {
	lookups: Arc<DashMap<String, CachedLookup>>,
	ttl: Duration,
	cleanup_interval_secs: u64,
}

impl MemoryStore {
	/// Create a new memory store with the default 30-day TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::days(DEFAULT_TTL_DAYS))
	}

	/// Create a new memory store with a custom TTL
	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			lookups: Arc::new(DashMap::new()),
			ttl,
			cleanup_interval_secs: CLEANUP_INTERVAL_SECS,
		}
	}

	/// Override the background sweep interval (mainly for tests)
	pub fn with_cleanup_interval(mut self, secs: u64) -> Self {
		self.cleanup_interval_secs = secs;
		self
	}

	/// The configured time-to-live
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Start the TTL cleanup task for stale lookups
	pub fn start_ttl_cleanup(&self) -> tokio::task::JoinHandle<()> {
		let lookups = Arc::clone(&self.lookups);
		let ttl = self.ttl;
		let sweep_secs = self.cleanup_interval_secs;

		tokio::spawn(async move {
			let mut cleanup_interval =
				interval(tokio::time::Duration::from_secs(sweep_secs));

			loop {
				cleanup_interval.tick().await;

				let mut removed = 0usize;
				lookups.retain(|_plate, lookup| {
					if lookup.is_stale(ttl) {
						removed += 1;
						false
					} else {
						true
					}
				});

				if removed > 0 {
					debug!("Cleaned up {} stale cached lookups", removed);
				}
			}
		})
	}

	/// Remove stale lookups immediately, returning how many were dropped
	pub fn cleanup_stale_lookups(&self) -> usize {
		let mut removed = 0usize;
		self.lookups.retain(|_plate, lookup| {
			if lookup.is_stale(self.ttl) {
				removed += 1;
				false
			} else {
				true
			}
		});

		if removed > 0 {
			info!("Cleaned up {} stale cached lookups", removed);
		}

		removed
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Storage for MemoryStore {
	async fn get_lookup(&self, plate: &Plate) -> StorageResult<Option<CachedLookup>> {
		if let Some(lookup) = self.lookups.get(plate.as_str()) {
			if lookup.is_stale(self.ttl) {
				drop(lookup);
				self.lookups.remove(plate.as_str());
				return Ok(None);
			}
			return Ok(Some(lookup.clone()));
		}
		Ok(None)
	}

	async fn put_lookup(&self, lookup: CachedLookup) -> StorageResult<String> {
		let id = lookup.id.clone();
		debug!(
			"Caching lookup {} for plate {} (status: {})",
			id,
			lookup.plate,
			lookup.status.as_str()
		);
		self.lookups.insert(lookup.plate.clone(), lookup);
		Ok(id)
	}

	async fn clear_lookup(&self, plate: &Plate) -> StorageResult<bool> {
		Ok(self.lookups.remove(plate.as_str()).is_some())
	}

	async fn lookup_count(&self) -> StorageResult<usize> {
		Ok(self.lookups.len())
	}

	async fn health_check(&self) -> StorageResult<bool> {
		// For in-memory storage, just check that the map is accessible
		Ok(true)
	}

	async fn stats(&self) -> StorageResult<StorageStats> {
		let total = self.lookups.len();
		let fresh = self
			.lookups
			.iter()
			.filter(|entry| !entry.value().is_stale(self.ttl))
			.count();

		Ok(StorageStats {
			total_lookups: total,
			fresh_lookups: fresh,
		})
	}

	async fn close(&self) -> StorageResult<()> {
		// For memory store, there's nothing to close
		Ok(())
	}

	async fn start_background_tasks(&self) -> StorageResult<()> {
		self.start_ttl_cleanup();
		Ok(())
	}
}
