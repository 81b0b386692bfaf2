//! Shared HTTP client mechanics for provider implementations

use reqwest::{
	header::{HeaderMap, HeaderValue},
	Client, Response,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use vrm_types::{ProviderError, ProviderResult, SecretString};

/// Connection settings shared by both provider clients
#[derive(Debug, Clone)]
pub struct ProviderConnection {
	pub endpoint: String,
	pub api_key: SecretString,
	pub timeout_ms: u64,
	/// Use the provider's sandbox behavior instead of live data
	pub test_mode: bool,
}

/// Build a reqwest client with the provider's default headers and timeout
pub(crate) fn build_client(connection: &ProviderConnection) -> ProviderResult<Client> {
	let mut headers = HeaderMap::new();
	headers.insert("Content-Type", HeaderValue::from_static("application/json"));
	headers.insert("Accept", HeaderValue::from_static("application/json"));
	headers.insert(
		"User-Agent",
		HeaderValue::from_static("VRM-Aggregator/1.0"),
	);
	if connection.test_mode {
		headers.insert("X-Sandbox-Mode", HeaderValue::from_static("true"));
	}

	let api_key_value = HeaderValue::from_str(connection.api_key.expose_secret())
		.map_err(|_| ProviderError::Config {
			reason: "API key contains characters not valid in a header".to_string(),
		})?;
	headers.insert("X-Api-Key", api_key_value);

	Client::builder()
		.default_headers(headers)
		.timeout(std::time::Duration::from_millis(connection.timeout_ms))
		.build()
		.map_err(ProviderError::Http)
}

/// Properly construct a URL by joining the base endpoint with a path
pub(crate) fn build_url(base_url: &str, path: &str) -> ProviderResult<Url> {
	let mut base = Url::parse(base_url).map_err(|e| ProviderError::Config {
		reason: format!("Invalid base URL '{}': {}", base_url, e),
	})?;

	// Ensure the base URL is treated as a directory so join() appends
	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}

	base.join(path).map_err(|e| ProviderError::Config {
		reason: format!("Failed to join URL path '{}' to base '{}': {}", path, base_url, e),
	})
}

/// Check the status and decode a JSON response body
pub(crate) async fn read_json<T: DeserializeOwned>(
	provider: &str,
	plate: &str,
	response: Response,
) -> ProviderResult<T> {
	let status = response.status();
	if !status.is_success() {
		return Err(ProviderError::from_status(provider, plate, status.as_u16()));
	}

	let body = response.text().await.map_err(ProviderError::Http)?;
	debug!("{} response body: {} bytes", provider, body.len());

	serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse {
		reason: format!("Failed to parse {} response: {}", provider, e),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_build_url_joins_paths() {
		let url = build_url("https://api.example.com/v2", "vehicles/AB12CDE").unwrap();
		assert_eq!(url.as_str(), "https://api.example.com/v2/vehicles/AB12CDE");

		let url = build_url("https://api.example.com/v2/", "vehicles/AB12CDE/mot-tests").unwrap();
		assert_eq!(
			url.as_str(),
			"https://api.example.com/v2/vehicles/AB12CDE/mot-tests"
		);
	}

	#[test]
	fn test_build_url_rejects_garbage_base() {
		let err = build_url("not a url", "vehicles/AB12CDE").unwrap_err();
		assert_eq!(err.code(), "config");
	}

	#[test]
	fn test_build_client_applies_headers() {
		let connection = ProviderConnection {
			endpoint: "https://api.example.com".to_string(),
			api_key: SecretString::from_str("test-key"),
			timeout_ms: 5000,
			test_mode: true,
		};
		assert!(build_client(&connection).is_ok());
	}
}
