//! HTTP client for the trade valuation provider
//!
//! One GET per (plate, mileage) pair returning private-sale, retail, and
//! trade price points plus a confidence indicator.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use vrm_types::{Plate, ProviderError, ProviderResult, ValuationPayload, ValuationProvider};

use crate::client::{build_client, build_url, read_json, ProviderConnection};
use crate::VALUATION_PROVIDER_ID;

/// Client for the valuation provider
#[derive(Debug)]
pub struct HttpValuationClient {
	connection: ProviderConnection,
	client: Client,
}

impl HttpValuationClient {
	pub fn new(connection: ProviderConnection) -> ProviderResult<Self> {
		let client = build_client(&connection)?;
		Ok(Self { connection, client })
	}
}

#[async_trait]
impl ValuationProvider for HttpValuationClient {
	fn provider_id(&self) -> &str {
		VALUATION_PROVIDER_ID
	}

	async fn fetch(&self, plate: &Plate, mileage: u32) -> ProviderResult<ValuationPayload> {
		if mileage == 0 {
			return Err(ProviderError::Config {
				reason: "Valuation requires a positive mileage figure".to_string(),
			});
		}

		let mut url = build_url(
			&self.connection.endpoint,
			&format!("valuations/{}", plate),
		)?;
		url.query_pairs_mut()
			.append_pair("mileage", &mileage.to_string());

		debug!("Fetching valuation for plate {} at {} miles", plate, mileage);

		let response = self
			.client
			.get(url)
			.send()
			.await
			.map_err(ProviderError::Http)?;

		read_json(VALUATION_PROVIDER_ID, plate.as_str(), response).await
	}

	async fn health_check(&self) -> ProviderResult<bool> {
		let url = build_url(&self.connection.endpoint, "status")?;
		let response = self
			.client
			.get(url)
			.send()
			.await
			.map_err(ProviderError::Http)?;
		Ok(response.status().is_success())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use vrm_types::SecretString;

	fn test_client() -> HttpValuationClient {
		HttpValuationClient::new(ProviderConnection {
			endpoint: "https://valuations.example.com/v1".to_string(),
			api_key: SecretString::from_str("test-key"),
			timeout_ms: 5000,
			test_mode: false,
		})
		.unwrap()
	}

	#[tokio::test]
	async fn test_zero_mileage_is_rejected_before_any_request() {
		let client = test_client();
		let plate = Plate::parse("AB12CDE").unwrap();
		let err = client.fetch(&plate, 0).await.unwrap_err();
		assert_eq!(err.code(), "config");
	}

	#[test]
	fn test_provider_id() {
		assert_eq!(test_client().provider_id(), VALUATION_PROVIDER_ID);
	}
}
