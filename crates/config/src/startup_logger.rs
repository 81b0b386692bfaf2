//! Service startup logging
//!
//! Logs service, build, and environment information when the server boots.

use std::env;
use tracing::info;

/// Logs comprehensive service information at startup
pub fn log_service_info() {
	let service_name = "vrm-aggregator";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Vehicle Data Enrichment Service Starting ===");
	info!("Service: {} v{}", service_name, service_version);
	info!("Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("Log Level: {}", rust_log);
	}

	info!(
		"Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("Vehicle Data Enrichment Service Shutting Down");
	info!(
		"Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs additional startup completion information
pub fn log_startup_complete(bind_address: &str) {
	info!("Vehicle Data Enrichment Service Started Successfully");
	info!("Server listening on: {}", bind_address);
	info!("Ready to accept requests");
}
