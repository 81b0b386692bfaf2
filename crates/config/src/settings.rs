//! Configuration settings structures

use crate::configurable_value::ConfigurableValue;
use serde::{Deserialize, Serialize};

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub providers: ProviderSettings,
	pub cache: CacheSettings,
	pub timeouts: TimeoutSettings,
	pub environment: EnvironmentSettings,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

/// Upstream provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderSettings {
	pub spec: ProviderEndpoint,
	pub valuation: ProviderEndpoint,
}

/// Connection settings for one upstream provider
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderEndpoint {
	pub endpoint: String,
	pub api_key: ConfigurableValue,
	pub timeout_ms: u64,
	pub enabled: bool,
}

/// Lookup-cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheSettings {
	/// Time-to-live for cached lookups, in days
	pub ttl_days: i64,
	/// Interval between background sweeps of stale records, in seconds
	pub cleanup_interval_secs: u64,
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TimeoutSettings {
	/// Per-provider call timeout applied by the orchestrator
	pub per_provider_ms: u64,
	/// Request timeout for the underlying HTTP clients
	pub request_ms: u64,
}

/// Environment-specific settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EnvironmentSettings {
	pub profile: EnvironmentProfile,
	pub debug: bool,
	/// Use provider sandbox behavior instead of live data
	pub test_mode: bool,
}

/// Environment profiles
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
	Development,
	Staging,
	Production,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Settings {
	/// The address the server binds to
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			server: ServerSettings::default(),
			providers: ProviderSettings::default(),
			cache: CacheSettings::default(),
			timeouts: TimeoutSettings::default(),
			environment: EnvironmentSettings::default(),
			logging: LoggingSettings::default(),
		}
	}
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 4000,
		}
	}
}

impl Default for ProviderSettings {
	fn default() -> Self {
		Self {
			spec: ProviderEndpoint {
				endpoint: "https://api.vehicledata.example.com/v2".to_string(),
				api_key: ConfigurableValue::from_env("SPEC_PROVIDER_API_KEY"),
				timeout_ms: 10000,
				enabled: true,
			},
			valuation: ProviderEndpoint {
				endpoint: "https://valuations.example.com/v1".to_string(),
				api_key: ConfigurableValue::from_env("VALUATION_PROVIDER_API_KEY"),
				timeout_ms: 10000,
				enabled: true,
			},
		}
	}
}

impl Default for ProviderEndpoint {
	fn default() -> Self {
		Self {
			endpoint: String::new(),
			api_key: ConfigurableValue::from_plain(""),
			timeout_ms: 10000,
			enabled: true,
		}
	}
}

impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			ttl_days: 30,
			cleanup_interval_secs: 3600,
		}
	}
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			per_provider_ms: 15000,
			request_ms: 10000,
		}
	}
}

impl Default for EnvironmentSettings {
	fn default() -> Self {
		Self {
			profile: EnvironmentProfile::Development,
			debug: false,
			test_mode: false,
		}
	}
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_boot_without_a_config_file() {
		let settings = Settings::default();
		assert_eq!(settings.bind_address(), "0.0.0.0:4000");
		assert_eq!(settings.cache.ttl_days, 30);
		assert!(settings.providers.spec.enabled);
		assert_eq!(settings.environment.profile, EnvironmentProfile::Development);
	}

	#[test]
	fn test_partial_config_falls_back_per_section() {
		let json = r#"{ "server": { "host": "127.0.0.1", "port": 8080 } }"#;
		let settings: Settings = serde_json::from_str(json).unwrap();
		assert_eq!(settings.bind_address(), "127.0.0.1:8080");
		assert_eq!(settings.cache.ttl_days, 30);
	}

	#[test]
	fn test_api_key_accepts_env_indirection() {
		let json = r#"{
			"providers": {
				"spec": {
					"endpoint": "https://sandbox.vehicledata.example.com/v2",
					"api_key": { "type": "env", "value": "SPEC_KEY" },
					"timeout_ms": 5000,
					"enabled": true
				}
			}
		}"#;
		let settings: Settings = serde_json::from_str(json).unwrap();
		assert_eq!(
			settings.providers.spec.api_key.description(),
			"environment variable 'SPEC_KEY'"
		);
	}
}
