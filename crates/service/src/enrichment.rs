//! Enrichment orchestration
//!
//! The only stateful coordination point: checks the lookup cache, calls the
//! two providers (valuation strictly after spec/history, since it needs a
//! mileage figure the spec payload may supply), merges the payloads, and
//! persists the result. Partial upstream failure is never fatal: the
//! caller always receives a record, plus human-readable warnings naming the
//! sources that were unavailable.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use vrm_types::{
	CachedLookup, CanonicalVehicleRecord, CheckStatus, DataSource, LookupStorage, Plate,
	PlateError, SpecHistoryProvider, ValuationProvider,
};

use crate::merge::merge_payloads;

/// Mileage assumed when neither the caller nor the spec payload offers one
pub const DEFAULT_MILEAGE_ESTIMATE: u32 = 60_000;

/// Warning attached when the spec/history provider could not be consulted
pub const SPEC_UNAVAILABLE_WARNING: &str = "vehicle specification data unavailable";

/// Warning attached when the valuation provider could not be consulted
pub const VALUATION_UNAVAILABLE_WARNING: &str = "valuation data unavailable";

/// Result type for enrichment operations
pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

/// Errors that reach enrichment callers
///
/// Upstream and cache failures are degraded internally; only invalid input
/// surfaces here.
#[derive(Debug, Error)]
pub enum EnrichmentError {
	#[error("Invalid registration plate: {0}")]
	InvalidPlate(#[from] PlateError),
}

/// Outcome of one enrichment lookup
#[derive(Debug, Clone)]
pub struct EnrichedLookup {
	/// The merged, source-tagged record
	pub record: CanonicalVehicleRecord,
	/// Outcome classification by provider successes
	pub status: CheckStatus,
	/// Sources that responded successfully
	pub sources: Vec<DataSource>,
	/// Human-readable notes on unavailable sources, for display or logging
	pub warnings: Vec<String>,
	/// Identifier of the persisted cache record, when the write succeeded
	pub cache_id: Option<String>,
	/// Whether this result was served from the cache
	pub from_cache: bool,
	/// When the underlying enrichment run completed
	pub checked_at: DateTime<Utc>,
}

/// Service statistics snapshot
#[derive(Debug, Clone)]
pub struct EnrichmentStats {
	pub provider_timeout_ms: u64,
	pub test_mode: bool,
	pub plates_in_flight: usize,
}

/// Coordinates providers, merger, and cache for vehicle lookups
pub struct EnrichmentService {
	spec: Arc<dyn SpecHistoryProvider>,
	valuation: Arc<dyn ValuationProvider>,
	storage: Arc<dyn LookupStorage>,
	provider_timeout_ms: u64,
	test_mode: bool,
	/// Per-plate guards so concurrent lookups for one plate coalesce into a
	/// single upstream fetch and a single cache write
	in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl EnrichmentService {
	pub fn new(
		spec: Arc<dyn SpecHistoryProvider>,
		valuation: Arc<dyn ValuationProvider>,
		storage: Arc<dyn LookupStorage>,
		provider_timeout_ms: u64,
		test_mode: bool,
	) -> Self {
		Self {
			spec,
			valuation,
			storage,
			provider_timeout_ms,
			test_mode,
			in_flight: DashMap::new(),
		}
	}

	/// Look up the canonical record for a registration plate
	///
	/// With `use_cache` a fresh cached record is returned without touching
	/// the providers. A cache miss (or `use_cache` false) runs a full
	/// enrichment and always re-writes the cache for the plate.
	pub async fn lookup(
		&self,
		plate: &str,
		use_cache: bool,
		mileage: Option<u32>,
	) -> EnrichmentResult<EnrichedLookup> {
		let plate = Plate::parse(plate)?;

		if use_cache {
			if let Some(hit) = self.read_cache(&plate).await {
				debug!("Cache hit for plate {}", plate);
				return Ok(hit);
			}
		}

		let guard = self
			.in_flight
			.entry(plate.as_str().to_string())
			.or_insert_with(|| Arc::new(Mutex::new(())))
			.clone();

		let result = {
			let _permit = guard.lock().await;

			// A waiter that queued behind the winning fetch finds the plate
			// already cached; re-check before going upstream.
			let coalesced = if use_cache {
				self.read_cache(&plate).await
			} else {
				None
			};

			match coalesced {
				Some(hit) => hit,
				None => self.refresh(&plate, mileage).await,
			}
		};

		drop(guard);
		self.in_flight
			.remove_if(plate.as_str(), |_, g| Arc::strong_count(g) == 1);

		Ok(result)
	}

	/// Drop the cached record for a plate (forced-refresh and debug flows)
	pub async fn clear(&self, plate: &str) -> EnrichmentResult<bool> {
		let plate = Plate::parse(plate)?;
		match self.storage.clear_lookup(&plate).await {
			Ok(existed) => Ok(existed),
			Err(e) => {
				warn!("Failed to clear cached lookup for {}: {}", plate, e);
				Ok(false)
			},
		}
	}

	/// Probe both providers, keyed by provider id
	pub async fn health_check_all(&self) -> std::collections::HashMap<String, bool> {
		let mut results = std::collections::HashMap::new();

		let spec_healthy = self.spec.health_check().await.unwrap_or(false);
		results.insert(self.spec.provider_id().to_string(), spec_healthy);

		let valuation_healthy = self.valuation.health_check().await.unwrap_or(false);
		results.insert(self.valuation.provider_id().to_string(), valuation_healthy);

		results
	}

	/// Current service statistics
	pub fn stats(&self) -> EnrichmentStats {
		EnrichmentStats {
			provider_timeout_ms: self.provider_timeout_ms,
			test_mode: self.test_mode,
			plates_in_flight: self.in_flight.len(),
		}
	}

	/// Read the cache, degrading storage errors to a miss
	async fn read_cache(&self, plate: &Plate) -> Option<EnrichedLookup> {
		match self.storage.get_lookup(plate).await {
			Ok(Some(cached)) => Some(EnrichedLookup {
				record: cached.record,
				status: cached.status,
				sources: cached.sources,
				warnings: Vec::new(),
				cache_id: Some(cached.id),
				from_cache: true,
				checked_at: cached.checked_at,
			}),
			Ok(None) => None,
			Err(e) => {
				warn!("Cache read failed for {}: {}", plate, e);
				None
			},
		}
	}

	/// Run a full enrichment: spec/history, then valuation, then merge and
	/// persist. Every step that can fail degrades instead of aborting.
	async fn refresh(&self, plate: &Plate, mileage: Option<u32>) -> EnrichedLookup {
		let started = Instant::now();
		let mut warnings = Vec::new();
		let mut sources = Vec::new();
		let per_call = Duration::from_millis(self.provider_timeout_ms);

		let spec_payload = match timeout(per_call, self.spec.fetch(plate)).await {
			Ok(Ok(payload)) => {
				sources.push(DataSource::SpecHistory);
				Some(payload)
			},
			Ok(Err(e)) => {
				warn!(
					"Spec provider failed for {}: {} (code: {})",
					plate,
					e,
					e.code()
				);
				warnings.push(SPEC_UNAVAILABLE_WARNING.to_string());
				None
			},
			Err(_) => {
				warn!(
					"Spec provider timed out after {}ms for {}",
					self.provider_timeout_ms, plate
				);
				warnings.push(SPEC_UNAVAILABLE_WARNING.to_string());
				None
			},
		};

		// Valuation needs a mileage figure: the caller's, else whatever the
		// spec payload recorded, else a fixed estimate.
		let mileage_estimate = mileage
			.or_else(|| spec_payload.as_ref().and_then(|p| p.latest_mileage()))
			.unwrap_or(DEFAULT_MILEAGE_ESTIMATE);

		let valuation_payload =
			match timeout(per_call, self.valuation.fetch(plate, mileage_estimate)).await {
				Ok(Ok(payload)) => {
					sources.push(DataSource::Valuation);
					Some(payload)
				},
				Ok(Err(e)) => {
					warn!(
						"Valuation provider failed for {}: {} (code: {})",
						plate,
						e,
						e.code()
					);
					warnings.push(VALUATION_UNAVAILABLE_WARNING.to_string());
					None
				},
				Err(_) => {
					warn!(
						"Valuation provider timed out after {}ms for {}",
						self.provider_timeout_ms, plate
					);
					warnings.push(VALUATION_UNAVAILABLE_WARNING.to_string());
					None
				},
			};

		let record = merge_payloads(
			plate.clone(),
			spec_payload.as_ref(),
			valuation_payload.as_ref(),
		);

		let status = match sources.len() {
			2 => CheckStatus::Complete,
			0 => CheckStatus::Empty,
			_ => CheckStatus::Partial,
		};

		let lookup = CachedLookup::new(record.clone(), status, sources.clone(), self.test_mode);
		let checked_at = lookup.checked_at;

		// The cache is an optimization: a failed write costs the next caller
		// a refetch, nothing more.
		let cache_id = match self.storage.put_lookup(lookup).await {
			Ok(id) => Some(id),
			Err(e) => {
				warn!("Failed to cache lookup for {}: {}", plate, e);
				None
			},
		};

		info!(
			"Enrichment for {} finished in {}ms (status: {}, fields: {}, warnings: {})",
			plate,
			started.elapsed().as_millis(),
			status.as_str(),
			record.populated_fields(),
			warnings.len()
		);

		EnrichedLookup {
			record,
			status,
			sources,
			warnings,
			cache_id,
			from_cache: false,
			checked_at,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
	use vrm_storage::MemoryStore;
	use vrm_types::{
		EstimatedValue, ProviderError, ProviderResult, SpecPayload, ValuationPayload,
		VehicleDetails,
	};

	struct MockSpec {
		should_fail: bool,
		recorded_mileage: Option<u32>,
		calls: AtomicUsize,
	}

	impl MockSpec {
		fn healthy() -> Self {
			Self {
				should_fail: false,
				recorded_mileage: None,
				calls: AtomicUsize::new(0),
			}
		}

		fn failing() -> Self {
			Self {
				should_fail: true,
				recorded_mileage: None,
				calls: AtomicUsize::new(0),
			}
		}
	}

	#[async_trait]
	impl SpecHistoryProvider for MockSpec {
		fn provider_id(&self) -> &str {
			"spec-history-v1"
		}

		async fn fetch(&self, plate: &Plate) -> ProviderResult<SpecPayload> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if self.should_fail {
				return Err(ProviderError::from_status(
					self.provider_id(),
					plate.as_str(),
					503,
				));
			}
			Ok(SpecPayload {
				details: Some(VehicleDetails {
					make: Some("BMW".to_string()),
					model: Some("3 Series".to_string()),
					variant: None,
					colour: None,
					fuel_type: Some("Diesel".to_string()),
					transmission: None,
					body_style: None,
					engine_capacity_cc: None,
					doors: None,
					seats: None,
					year_of_manufacture: None,
					co2_g_km: None,
					annual_ved_gbp: None,
					insurance_group: None,
					mpg_urban: None,
					mpg_extra_urban: None,
					mpg_combined: None,
					recorded_mileage: self.recorded_mileage,
				}),
				history: None,
				mot: None,
			})
		}

		async fn health_check(&self) -> ProviderResult<bool> {
			Ok(!self.should_fail)
		}
	}

	struct MockValuation {
		should_fail: bool,
		last_mileage: AtomicU32,
		calls: AtomicUsize,
	}

	impl MockValuation {
		fn healthy() -> Self {
			Self {
				should_fail: false,
				last_mileage: AtomicU32::new(0),
				calls: AtomicUsize::new(0),
			}
		}

		fn failing() -> Self {
			Self {
				should_fail: true,
				last_mileage: AtomicU32::new(0),
				calls: AtomicUsize::new(0),
			}
		}
	}

	#[async_trait]
	impl ValuationProvider for MockValuation {
		fn provider_id(&self) -> &str {
			"valuation-v1"
		}

		async fn fetch(&self, plate: &Plate, mileage: u32) -> ProviderResult<ValuationPayload> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.last_mileage.store(mileage, Ordering::SeqCst);
			if self.should_fail {
				return Err(ProviderError::from_status(
					self.provider_id(),
					plate.as_str(),
					429,
				));
			}
			Ok(ValuationPayload {
				make: None,
				model: None,
				colour: None,
				fuel_type: None,
				mileage_used: Some(mileage),
				estimated_value: EstimatedValue {
					private_sale: 12000,
					retail: 14000,
					trade: 10500,
				},
				confidence: Some(0.9),
			})
		}

		async fn health_check(&self) -> ProviderResult<bool> {
			Ok(!self.should_fail)
		}
	}

	fn service(
		spec: Arc<MockSpec>,
		valuation: Arc<MockValuation>,
		storage: Arc<MemoryStore>,
	) -> EnrichmentService {
		EnrichmentService::new(spec, valuation, storage, 5000, false)
	}

	#[tokio::test]
	async fn test_full_lookup_merges_both_sources() {
		let svc = service(
			Arc::new(MockSpec::healthy()),
			Arc::new(MockValuation::healthy()),
			Arc::new(MemoryStore::new()),
		);

		let result = svc.lookup("ab12 cde", false, Some(50000)).await.unwrap();

		assert_eq!(result.status, CheckStatus::Complete);
		assert!(result.warnings.is_empty());
		assert!(result.cache_id.is_some());
		assert!(!result.from_cache);
		assert_eq!(result.record.make.as_ref().unwrap().value, "BMW");
		assert_eq!(
			result.record.valuation.as_ref().unwrap().value.private_sale,
			12000
		);
	}

	#[tokio::test]
	async fn test_valuation_failure_degrades_with_warning() {
		let svc = service(
			Arc::new(MockSpec::healthy()),
			Arc::new(MockValuation::failing()),
			Arc::new(MemoryStore::new()),
		);

		let result = svc.lookup("AB12CDE", false, None).await.unwrap();

		assert_eq!(result.status, CheckStatus::Partial);
		assert_eq!(result.warnings, vec![VALUATION_UNAVAILABLE_WARNING.to_string()]);
		assert_eq!(result.record.make.as_ref().unwrap().value, "BMW");
		assert!(result.record.valuation.is_none());
	}

	#[tokio::test]
	async fn test_total_failure_still_returns_a_record() {
		let svc = service(
			Arc::new(MockSpec::failing()),
			Arc::new(MockValuation::failing()),
			Arc::new(MemoryStore::new()),
		);

		let result = svc.lookup("AB12CDE", false, None).await.unwrap();

		assert_eq!(result.status, CheckStatus::Empty);
		assert_eq!(result.warnings.len(), 2);
		assert!(result.record.is_empty());
		assert_eq!(result.record.plate.as_str(), "AB12CDE");
	}

	#[tokio::test]
	async fn test_repeated_lookups_keep_one_cached_record() {
		let storage = Arc::new(MemoryStore::new());
		let svc = service(
			Arc::new(MockSpec::healthy()),
			Arc::new(MockValuation::healthy()),
			Arc::clone(&storage),
		);

		svc.lookup("AB12CDE", false, None).await.unwrap();
		svc.lookup("AB12CDE", false, None).await.unwrap();

		assert_eq!(storage.lookup_count().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn test_cache_hit_skips_providers() {
		let spec = Arc::new(MockSpec::healthy());
		let valuation = Arc::new(MockValuation::healthy());
		let svc = service(
			Arc::clone(&spec),
			Arc::clone(&valuation),
			Arc::new(MemoryStore::new()),
		);

		let first = svc.lookup("AB12CDE", true, None).await.unwrap();
		assert!(!first.from_cache);

		let second = svc.lookup("AB12CDE", true, None).await.unwrap();
		assert!(second.from_cache);
		assert_eq!(second.cache_id, first.cache_id);
		assert_eq!(spec.calls.load(Ordering::SeqCst), 1);
		assert_eq!(valuation.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_forced_refresh_rewrites_cache() {
		let storage = Arc::new(MemoryStore::new());
		let svc = service(
			Arc::new(MockSpec::healthy()),
			Arc::new(MockValuation::healthy()),
			Arc::clone(&storage),
		);

		let first = svc.lookup("AB12CDE", true, None).await.unwrap();
		let second = svc.lookup("AB12CDE", false, None).await.unwrap();

		assert!(!second.from_cache);
		assert_ne!(second.cache_id, first.cache_id);
		assert_eq!(storage.lookup_count().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn test_mileage_precedence() {
		// Explicit argument wins
		let valuation = Arc::new(MockValuation::healthy());
		let svc = service(
			Arc::new(MockSpec::healthy()),
			Arc::clone(&valuation),
			Arc::new(MemoryStore::new()),
		);
		svc.lookup("AB12CDE", false, Some(50000)).await.unwrap();
		assert_eq!(valuation.last_mileage.load(Ordering::SeqCst), 50000);

		// Spec payload's own reading next
		let valuation = Arc::new(MockValuation::healthy());
		let spec = Arc::new(MockSpec {
			should_fail: false,
			recorded_mileage: Some(41200),
			calls: AtomicUsize::new(0),
		});
		let svc = service(spec, Arc::clone(&valuation), Arc::new(MemoryStore::new()));
		svc.lookup("AB12CDE", false, None).await.unwrap();
		assert_eq!(valuation.last_mileage.load(Ordering::SeqCst), 41200);

		// Fixed default last
		let valuation = Arc::new(MockValuation::healthy());
		let svc = service(
			Arc::new(MockSpec::healthy()),
			Arc::clone(&valuation),
			Arc::new(MemoryStore::new()),
		);
		svc.lookup("AB12CDE", false, None).await.unwrap();
		assert_eq!(
			valuation.last_mileage.load(Ordering::SeqCst),
			DEFAULT_MILEAGE_ESTIMATE
		);
	}

	#[tokio::test]
	async fn test_invalid_plate_is_the_only_fatal_input() {
		let svc = service(
			Arc::new(MockSpec::healthy()),
			Arc::new(MockValuation::healthy()),
			Arc::new(MemoryStore::new()),
		);

		let err = svc.lookup("", true, None).await.unwrap_err();
		assert!(matches!(err, EnrichmentError::InvalidPlate(_)));
	}

	#[tokio::test]
	async fn test_concurrent_lookups_coalesce() {
		let spec = Arc::new(MockSpec::healthy());
		let svc = Arc::new(service(
			Arc::clone(&spec),
			Arc::new(MockValuation::healthy()),
			Arc::new(MemoryStore::new()),
		));

		let a = {
			let svc = Arc::clone(&svc);
			tokio::spawn(async move { svc.lookup("AB12CDE", true, None).await })
		};
		let b = {
			let svc = Arc::clone(&svc);
			tokio::spawn(async move { svc.lookup("AB12CDE", true, None).await })
		};

		let first = a.await.unwrap().unwrap();
		let second = b.await.unwrap().unwrap();

		// One of the two did the fetch; the other reused its cache write
		assert_eq!(spec.calls.load(Ordering::SeqCst), 1);
		assert_eq!(first.record.make, second.record.make);
		assert_eq!(svc.stats().plates_in_flight, 0);
	}

	#[tokio::test]
	async fn test_clear_then_lookup_refetches() {
		let spec = Arc::new(MockSpec::healthy());
		let svc = service(
			Arc::clone(&spec),
			Arc::new(MockValuation::healthy()),
			Arc::new(MemoryStore::new()),
		);

		svc.lookup("AB12CDE", true, None).await.unwrap();
		assert!(svc.clear("AB12CDE").await.unwrap());

		let after = svc.lookup("AB12CDE", true, None).await.unwrap();
		assert!(!after.from_cache);
		assert_eq!(spec.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_health_check_all_reports_both_providers() {
		let svc = service(
			Arc::new(MockSpec::healthy()),
			Arc::new(MockValuation::failing()),
			Arc::new(MemoryStore::new()),
		);

		let health = svc.health_check_all().await;
		assert_eq!(health.get("spec-history-v1"), Some(&true));
		assert_eq!(health.get("valuation-v1"), Some(&false));
	}
}
