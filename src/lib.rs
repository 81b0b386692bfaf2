//! VRM Aggregator Library
//!
//! A vehicle data enrichment service: reconciles registration lookups from
//! a spec/history provider and a valuation provider into one source-tagged
//! canonical record, behind a TTL-bounded lookup cache.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

// Core domain types - the most commonly used types
pub use vrm_types::{
	chrono,
	// External dependencies for convenience
	serde_json,
	CachedLookup,
	CanonicalVehicleRecord,
	CheckStatus,
	DataSource,
	// Primary domain entities
	Plate,
	PlateError,
	ProviderError,
	SecretString,
	Sourced,
	SpecHistoryProvider,
	SpecPayload,
	ValuationPayload,
	ValuationProvider,
};

// Service layer
pub use vrm_service::{
	merge_payloads, EnrichedLookup, EnrichmentError, EnrichmentService, EnrichmentStats,
};

// Storage layer
pub use vrm_storage::{MemoryStore, Storage};

// Storage traits module for advanced usage
pub mod traits {
	pub use vrm_storage::traits::*;
}

// API layer
pub use vrm_api::{create_router, AppState};

// Providers
pub use vrm_providers::{
	HttpSpecClient, HttpValuationClient, SPEC_PROVIDER_ID, VALUATION_PROVIDER_ID,
};

// Config
pub use vrm_config::{
	load_config, log_service_info, log_startup_complete, ConfigurableValue, Settings,
};

// Module aliases for crate-level access
pub mod models {
	pub use vrm_types::*;
}

pub mod storage {
	pub use vrm_storage::*;
}

pub mod config {
	pub use vrm_config::*;
}

pub mod providers {
	pub use vrm_providers::*;
}

pub mod api {
	pub use vrm_api::*;
	pub mod routes {
		pub use vrm_api::{create_router, AppState};
	}
}

pub mod service {
	pub use vrm_service::*;
}

pub mod mocks;

// Re-export external dependencies for examples
pub use async_trait;

use vrm_providers::client::ProviderConnection;

/// Builder pattern for configuring the enrichment service
pub struct EnrichmentBuilder<S = MemoryStore>
where
	S: Storage + 'static,
{
	settings: Option<Settings>,
	storage: S,
	spec_provider: Option<Arc<dyn SpecHistoryProvider>>,
	valuation_provider: Option<Arc<dyn ValuationProvider>>,
}

impl EnrichmentBuilder<MemoryStore> {
	/// Create a new builder with default memory storage
	pub fn new() -> Self {
		Self::with_storage(MemoryStore::new())
	}

	/// Create a builder from configuration, sizing the default memory
	/// store's TTL and sweep interval from the cache settings
	pub fn from_config(settings: Settings) -> Self {
		let storage = MemoryStore::with_ttl(chrono::Duration::days(settings.cache.ttl_days))
			.with_cleanup_interval(settings.cache.cleanup_interval_secs);
		Self {
			settings: Some(settings),
			storage,
			spec_provider: None,
			valuation_provider: None,
		}
	}
}

impl Default for EnrichmentBuilder<MemoryStore> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S> EnrichmentBuilder<S>
where
	S: Storage + Clone + 'static,
{
	/// Create a builder with the provided storage
	pub fn with_storage(storage: S) -> Self {
		Self {
			settings: None,
			storage,
			spec_provider: None,
			valuation_provider: None,
		}
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Override the spec/history provider (used by tests and demos)
	pub fn with_spec_provider(mut self, provider: Arc<dyn SpecHistoryProvider>) -> Self {
		self.spec_provider = Some(provider);
		self
	}

	/// Override the valuation provider (used by tests and demos)
	pub fn with_valuation_provider(mut self, provider: Arc<dyn ValuationProvider>) -> Self {
		self.valuation_provider = Some(provider);
		self
	}

	/// Build the HTTP clients for any provider not explicitly supplied
	fn resolve_providers(
		&self,
		settings: &Settings,
	) -> Result<
		(Arc<dyn SpecHistoryProvider>, Arc<dyn ValuationProvider>),
		Box<dyn std::error::Error>,
	> {
		let spec: Arc<dyn SpecHistoryProvider> = match &self.spec_provider {
			Some(provider) => Arc::clone(provider),
			None => {
				let api_key = settings
					.providers
					.spec
					.api_key
					.resolve_for_secret()
					.map_err(|e| format!("Failed to resolve spec provider API key: {}", e))?;
				Arc::new(HttpSpecClient::new(ProviderConnection {
					endpoint: settings.providers.spec.endpoint.clone(),
					api_key,
					timeout_ms: settings.providers.spec.timeout_ms,
					test_mode: settings.environment.test_mode,
				})?)
			},
		};

		let valuation: Arc<dyn ValuationProvider> = match &self.valuation_provider {
			Some(provider) => Arc::clone(provider),
			None => {
				let api_key = settings
					.providers
					.valuation
					.api_key
					.resolve_for_secret()
					.map_err(|e| {
						format!("Failed to resolve valuation provider API key: {}", e)
					})?;
				Arc::new(HttpValuationClient::new(ProviderConnection {
					endpoint: settings.providers.valuation.endpoint.clone(),
					api_key,
					timeout_ms: settings.providers.valuation.timeout_ms,
					test_mode: settings.environment.test_mode,
				})?)
			},
		};

		Ok((spec, valuation))
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(
		&self,
		settings: &Settings,
	) -> Result<(), Box<dyn std::error::Error>> {
		use vrm_config::LogFormat;

		// Create env filter using config level or environment variable
		let log_level = &settings.logging.level;
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

		match settings.logging.format {
			LogFormat::Json => {
				let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
			LogFormat::Pretty => {
				let subscriber = tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
			LogFormat::Compact => {
				let subscriber = tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
		}

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);

		Ok(())
	}

	/// Wire the service and return the configured router with state
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();

		let (spec, valuation) = self.resolve_providers(&settings)?;

		let storage_arc: Arc<dyn Storage> = Arc::new(self.storage.clone());
		let enrichment_service = EnrichmentService::new(
			spec,
			valuation,
			Arc::clone(&storage_arc),
			settings.timeouts.per_provider_ms,
			settings.environment.test_mode,
		);

		let app_state = AppState {
			enrichment_service: Arc::new(enrichment_service),
			storage: storage_arc,
		};

		let router = create_router().with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Start the complete server with all defaults and setup
	///
	/// Handles everything needed to run the server: loading `.env`, loading
	/// configuration, initializing tracing, starting cache cleanup, and
	/// binding and serving the application.
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		// Load .env file if it exists
		dotenvy::dotenv().ok();

		// Use provided settings or load from config with defaults
		let using_provided_settings = self.settings.is_some();
		let settings = if using_provided_settings {
			self.settings.take().unwrap()
		} else {
			load_config().unwrap_or_default()
		};

		self.init_tracing_from_settings(&settings)?;

		log_service_info();

		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);
		info!(
			"Spec provider: {} ({}ms timeout)",
			settings.providers.spec.endpoint, settings.providers.spec.timeout_ms
		);
		info!(
			"Valuation provider: {} ({}ms timeout)",
			settings.providers.valuation.endpoint, settings.providers.valuation.timeout_ms
		);
		info!(
			"Cache TTL: {} days (test_mode: {})",
			settings.cache.ttl_days, settings.environment.test_mode
		);

		// Parse bind address
		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		if self.settings.is_none() {
			self.settings = Some(settings.clone());
		}

		let (app, state) = self.start().await?;

		// Kick off the storage TTL sweep
		state
			.storage
			.start_background_tasks()
			.await
			.map_err(|e| format!("Failed to start storage background tasks: {}", e))?;

		let listener = tokio::net::TcpListener::bind(addr).await?;

		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET    /health");
		info!("  GET    /ready");
		info!("  GET    /v1/vehicles/{{plate}}");
		info!("  DELETE /v1/vehicles/{{plate}}/cache");

		axum::serve(listener, app).await?;

		Ok(())
	}
}
