//! VRM Aggregator Server
//!
//! Main entry point for the enrichment server

use vrm_aggregator::{load_config, EnrichmentBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Resolve configuration first so the cache store is sized from it
	dotenvy::dotenv().ok();
	let settings = load_config().unwrap_or_default();

	EnrichmentBuilder::from_config(settings).start_server().await
}
