use std::sync::Arc;

use vrm_service::EnrichmentService;
use vrm_storage::Storage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub enrichment_service: Arc<EnrichmentService>,
	pub storage: Arc<dyn Storage>,
}
