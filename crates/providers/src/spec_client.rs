//! HTTP client for the vehicle specification / history provider
//!
//! The provider exposes three resources per registration: vehicle details,
//! keeper/write-off/finance history, and MOT test history. All three are
//! fetched concurrently; history and MOT failures degrade to an absent
//! section, while a failure on the details resource fails the whole call
//! since that is where not-found and auth errors surface.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;
use vrm_types::{
	HistoryRecord, MotRecord, Plate, ProviderError, ProviderResult, SpecHistoryProvider,
	SpecPayload, VehicleDetails,
};

use crate::client::{build_client, build_url, read_json, ProviderConnection};
use crate::SPEC_PROVIDER_ID;

/// Client for the spec/history provider
#[derive(Debug)]
pub struct HttpSpecClient {
	connection: ProviderConnection,
	client: Client,
}

impl HttpSpecClient {
	/// Create a new client; the underlying connection pool is reused across
	/// calls.
	pub fn new(connection: ProviderConnection) -> ProviderResult<Self> {
		let client = build_client(&connection)?;
		Ok(Self { connection, client })
	}

	async fn get_resource<T: DeserializeOwned>(
		&self,
		url: Url,
		plate: &Plate,
	) -> ProviderResult<T> {
		debug!("Fetching {} for plate {}", url.path(), plate);

		let response = self
			.client
			.get(url)
			.send()
			.await
			.map_err(ProviderError::Http)?;

		read_json(SPEC_PROVIDER_ID, plate.as_str(), response).await
	}

	/// Fetch an optional sub-resource, degrading any failure to `None`
	async fn get_optional_resource<T: DeserializeOwned>(
		&self,
		url: Url,
		plate: &Plate,
		resource: &str,
	) -> Option<T> {
		match self.get_resource(url, plate).await {
			Ok(value) => Some(value),
			Err(e) => {
				warn!(
					"Spec provider {} resource unavailable for {}: {} (code: {})",
					resource,
					plate,
					e,
					e.code()
				);
				None
			},
		}
	}
}

#[async_trait]
impl SpecHistoryProvider for HttpSpecClient {
	fn provider_id(&self) -> &str {
		SPEC_PROVIDER_ID
	}

	async fn fetch(&self, plate: &Plate) -> ProviderResult<SpecPayload> {
		let details_url = build_url(
			&self.connection.endpoint,
			&format!("vehicles/{}", plate),
		)?;
		let history_url = build_url(
			&self.connection.endpoint,
			&format!("vehicles/{}/history", plate),
		)?;
		let mot_url = build_url(
			&self.connection.endpoint,
			&format!("vehicles/{}/mot-tests", plate),
		)?;

		// All three resources are fetched concurrently and fail independently
		let (details, history, mot) = futures::join!(
			self.get_resource::<VehicleDetails>(details_url, plate),
			self.get_optional_resource::<HistoryRecord>(history_url, plate, "history"),
			self.get_optional_resource::<MotRecord>(mot_url, plate, "mot-tests"),
		);

		let details = details?;

		debug!(
			"Spec lookup for {} complete (history: {}, mot: {})",
			plate,
			history.is_some(),
			mot.is_some()
		);

		Ok(SpecPayload {
			details: Some(details),
			history,
			mot,
		})
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

	#[test]
	fn test_client_construction() {
		let client = HttpSpecClient::new(ProviderConnection {
			endpoint: "https://api.example.com/v2".to_string(),
			api_key: SecretString::from_str("test-key"),
			timeout_ms: 5000,
			test_mode: false,
		});
		assert!(client.is_ok());
		assert_eq!(client.unwrap().provider_id(), SPEC_PROVIDER_ID);
	}
}
