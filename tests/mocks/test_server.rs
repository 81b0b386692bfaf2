//! Test server for integration tests
//!
//! Spawns the full router on an ephemeral port with mock providers wired in.

use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;

use vrm_aggregator::mocks::{MockSpecProvider, MockValuationProvider};
use vrm_aggregator::{api::routes::create_router, EnrichmentBuilder};

/// Test server instance bound to an ephemeral local port
pub struct TestServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
}

impl TestServer {
	/// Spawn a test server with healthy mock providers
	pub async fn spawn() -> Result<Self, Box<dyn std::error::Error>> {
		Self::spawn_with(MockSpecProvider::new(), MockValuationProvider::new()).await
	}

	/// Spawn a test server with specific mock providers
	///
	/// The mocks are `Clone` and share their call counters, so callers can
	/// keep a clone to assert on call counts after driving the API.
	pub async fn spawn_with(
		spec: MockSpecProvider,
		valuation: MockValuationProvider,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let (_router, state) = EnrichmentBuilder::default()
			.with_spec_provider(Arc::new(spec))
			.with_valuation_provider(Arc::new(valuation))
			.start()
			.await?;

		let app: Router = create_router().with_state(state);

		Self::spawn_server_with_app(app).await
	}

	async fn spawn_server_with_app(app: Router) -> Result<Self, Box<dyn std::error::Error>> {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;

		let handle = tokio::spawn(async move {
			axum::serve(listener, app)
				.await
				.expect("Test server failed");
		});

		Ok(Self {
			base_url: format!("http://{}", addr),
			handle,
		})
	}

	/// Stop the server task
	pub fn abort(&self) {
		self.handle.abort();
	}
}
