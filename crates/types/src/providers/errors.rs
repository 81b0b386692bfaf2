//! Error types for upstream provider calls

use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by upstream provider clients
///
/// Every variant maps to a stable machine-readable code via
/// [`ProviderError::code`]; the orchestrator logs the code and degrades to
/// an absent payload rather than failing the overall lookup.
#[derive(Error, Debug)]
pub enum ProviderError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("Provider {provider} returned HTTP {status_code}: {reason}")]
	UpstreamStatus {
		provider: String,
		status_code: u16,
		reason: String,
	},

	#[error("Authentication failed for provider {provider}")]
	AuthenticationFailed { provider: String },

	#[error("Rate limit exceeded for provider {provider}")]
	RateLimited { provider: String },

	#[error("Vehicle {plate} not found by provider {provider}")]
	NotFound { provider: String, plate: String },

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Provider configuration error: {reason}")]
	Config { reason: String },
}

impl ProviderError {
	/// Stable machine-readable error code
	pub fn code(&self) -> &'static str {
		match self {
			ProviderError::Http(_) => "http_transport",
			ProviderError::UpstreamStatus { .. } => "upstream_status",
			ProviderError::AuthenticationFailed { .. } => "auth_failed",
			ProviderError::RateLimited { .. } => "rate_limited",
			ProviderError::NotFound { .. } => "not_found",
			ProviderError::Timeout { .. } => "timeout",
			ProviderError::InvalidResponse { .. } => "invalid_response",
			ProviderError::Serialization(_) => "serialization",
			ProviderError::Config { .. } => "config",
		}
	}

	/// Extract the HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			ProviderError::UpstreamStatus { status_code, .. } => Some(*status_code),
			ProviderError::Http(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			},
			_ => None,
		}
	}

	/// Classify a non-success HTTP status from an upstream provider
	pub fn from_status(provider: &str, plate: &str, status_code: u16) -> Self {
		match status_code {
			401 | 403 => Self::AuthenticationFailed {
				provider: provider.to_string(),
			},
			404 => Self::NotFound {
				provider: provider.to_string(),
				plate: plate.to_string(),
			},
			429 => Self::RateLimited {
				provider: provider.to_string(),
			},
			_ => {
				let reason = match status_code {
					400 => "Bad Request".to_string(),
					408 => "Request Timeout".to_string(),
					500 => "Internal Server Error".to_string(),
					502 => "Bad Gateway".to_string(),
					503 => "Service Unavailable".to_string(),
					504 => "Gateway Timeout".to_string(),
					_ => format!("HTTP Error {}", status_code),
				};
				Self::UpstreamStatus {
					provider: provider.to_string(),
					status_code,
					reason,
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_classification() {
		let err = ProviderError::from_status("spec-history-v1", "AB12CDE", 401);
		assert!(matches!(err, ProviderError::AuthenticationFailed { .. }));
		assert_eq!(err.code(), "auth_failed");

		let err = ProviderError::from_status("spec-history-v1", "AB12CDE", 404);
		assert!(matches!(err, ProviderError::NotFound { .. }));
		assert_eq!(err.code(), "not_found");

		let err = ProviderError::from_status("valuation-v1", "AB12CDE", 429);
		assert!(matches!(err, ProviderError::RateLimited { .. }));
		assert_eq!(err.code(), "rate_limited");

		let err = ProviderError::from_status("valuation-v1", "AB12CDE", 503);
		assert_eq!(err.status_code(), Some(503));
		assert!(err.to_string().contains("Service Unavailable"));
	}

	#[test]
	fn test_codes_are_distinct_per_failure_class() {
		let timeout = ProviderError::Timeout { timeout_ms: 5000 };
		let invalid = ProviderError::InvalidResponse {
			reason: "truncated body".to_string(),
		};
		assert_ne!(timeout.code(), invalid.code());
		assert_eq!(timeout.status_code(), None);
	}
}
