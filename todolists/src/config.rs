//! Configuration management for the todolists application.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use todolists_runtime::StoreConfig;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote service configuration
    pub api: ApiConfig,
    /// Store runtime configuration
    pub store: StoreSettings,
    /// Log filter used when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Remote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the remote service; `None` runs local-only
    pub base_url: Option<String>,
    /// Value of the `API-KEY` header
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Store runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Effect-produced actions buffered for slow observers
    pub broadcast_capacity: usize,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_secs: u64,
}

impl StoreSettings {
    /// Runtime configuration for the store
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(
            self.broadcast_capacity,
            Duration::from_secs(self.shutdown_timeout_secs),
        )
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: lookup("TODOLISTS_API_URL").filter(|s| !s.trim().is_empty()),
                api_key: lookup("TODOLISTS_API_KEY").filter(|s| !s.is_empty()),
                timeout_secs: lookup("TODOLISTS_API_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            },
            store: StoreSettings {
                broadcast_capacity: lookup("TODOLISTS_BROADCAST_CAPACITY")
                    .and_then(|s| s.parse().ok())
                    .filter(|&n: &usize| n > 0)
                    .unwrap_or(16),
                shutdown_timeout_secs: lookup("TODOLISTS_SHUTDOWN_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            },
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Whether a remote service is configured
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.api.base_url.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_run_local_only() {
        let config = Config::default();
        assert!(!config.is_remote());
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.store.broadcast_capacity, 16);
        assert_eq!(config.store.shutdown_timeout_secs, 5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn reads_remote_settings() {
        let config = Config::from_lookup(lookup(&[
            ("TODOLISTS_API_URL", "https://example.test/api/1.1"),
            ("TODOLISTS_API_KEY", "secret"),
            ("TODOLISTS_API_TIMEOUT_SECS", "3"),
            ("TODOLISTS_SHUTDOWN_TIMEOUT_SECS", "1"),
        ]));
        assert!(config.is_remote());
        assert_eq!(config.api.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(
            config.store.store_config().default_shutdown_timeout,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("TODOLISTS_API_TIMEOUT_SECS", "soon"),
            ("TODOLISTS_BROADCAST_CAPACITY", "0"),
        ]));
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.store.broadcast_capacity, 16);
    }
}
