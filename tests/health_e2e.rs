//! Health and readiness E2E tests

mod mocks;

use crate::mocks::TestServer;
use reqwest::Client;
use vrm_aggregator::mocks::{MockSpecProvider, MockValuationProvider};

#[tokio::test]
async fn test_health_endpoint() {
	let server = TestServer::spawn().await.expect("Failed to start test server");
	let client = Client::new();

	let resp = client
		.get(format!("{}/health", server.base_url))
		.send()
		.await
		.unwrap();

	assert!(resp.status().is_success());
	assert_eq!(resp.text().await.unwrap(), "OK");

	server.abort();
}

#[tokio::test]
async fn test_ready_reports_storage_and_providers() {
	let server = TestServer::spawn().await.expect("Failed to start test server");
	let client = Client::new();

	let resp = client
		.get(format!("{}/ready", server.base_url))
		.send()
		.await
		.unwrap();

	assert!(resp.status().is_success());
	let body: serde_json::Value = resp.json().await.unwrap();
	assert_eq!(body["status"], "ready");
	assert_eq!(body["storage_healthy"], true);
	assert_eq!(body["providers"]["spec-history-v1"], true);
	assert_eq!(body["providers"]["valuation-v1"], true);

	server.abort();
}

#[tokio::test]
async fn test_ready_degrades_when_a_provider_is_down() {
	let server = TestServer::spawn_with(MockSpecProvider::new(), MockValuationProvider::failing())
		.await
		.expect("Failed to start test server");
	let client = Client::new();

	let resp = client
		.get(format!("{}/ready", server.base_url))
		.send()
		.await
		.unwrap();

	assert_eq!(resp.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
	let body: serde_json::Value = resp.json().await.unwrap();
	assert_eq!(body["status"], "degraded");
	assert_eq!(body["providers"]["valuation-v1"], false);

	server.abort();
}
