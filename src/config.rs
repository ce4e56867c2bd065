//! Planner Configuration
//!
//! Defaults suit local development; deployments override through
//! environment variables (set via systemd or the shell).
//!
//!   BLOOM_DATASET          local dataset path (.csv or .json)
//!   RECORD_STORE_URL       remote record store base URL (tier disabled if unset)
//!   SUGGEST_URL            chat-completions endpoint (AI tier disabled if unset)
//!   SUGGEST_API_KEY        bearer token for SUGGEST_URL
//!   SUGGEST_MODEL          model name sent to SUGGEST_URL
//!   TIER_TIMEOUT_MS        per-tier collaborator timeout
//!   REMOTE_CACHE_CAPACITY  max cached remote records
//!   PORT                   HTTP port for the API server

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub dataset_path: PathBuf,
    pub record_store_url: Option<String>,
    pub suggest_url: Option<String>,
    pub suggest_api_key: Option<String>,
    pub suggest_model: String,
    pub tier_timeout_ms: u64,
    pub remote_search_limit: usize,
    pub remote_cache_capacity: u64,
    pub port: u16,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/plants.csv"),
            record_store_url: None,
            suggest_url: None,
            suggest_api_key: None,
            suggest_model: "gpt-4o-mini".to_string(),
            tier_timeout_ms: 5_000,
            remote_search_limit: 5,
            remote_cache_capacity: 10_000,
            port: 3000,
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by whatever environment variables are set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(path) = get("BLOOM_DATASET") {
            config.dataset_path = PathBuf::from(path);
        }
        config.record_store_url = get("RECORD_STORE_URL");
        config.suggest_url = get("SUGGEST_URL");
        config.suggest_api_key = get("SUGGEST_API_KEY");
        if let Some(model) = get("SUGGEST_MODEL") {
            config.suggest_model = model;
        }

        config.tier_timeout_ms = parse_or("TIER_TIMEOUT_MS", get("TIER_TIMEOUT_MS"), config.tier_timeout_ms);
        config.remote_cache_capacity =
            parse_or("REMOTE_CACHE_CAPACITY", get("REMOTE_CACHE_CAPACITY"), config.remote_cache_capacity);
        config.port = parse_or("PORT", get("PORT"), config.port);

        config
    }

    pub fn tier_timeout(&self) -> Duration {
        Duration::from_millis(self.tier_timeout_ms)
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}='{}', using default", key, value);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PlannerConfig::from_lookup(|_| None);
        assert_eq!(config.dataset_path, PathBuf::from("data/plants.csv"));
        assert_eq!(config.tier_timeout(), Duration::from_secs(5));
        assert_eq!(config.remote_search_limit, 5);
        assert!(config.record_store_url.is_none());
        assert!(config.suggest_url.is_none());
    }

    #[test]
    fn test_overrides_and_invalid_numbers() {
        let config = PlannerConfig::from_lookup(lookup_from(&[
            ("BLOOM_DATASET", "/srv/plants.json"),
            ("RECORD_STORE_URL", "http://store.local/api"),
            ("SUGGEST_URL", "  "),
            ("TIER_TIMEOUT_MS", "250"),
            ("PORT", "not-a-port"),
        ]));
        assert_eq!(config.dataset_path, PathBuf::from("/srv/plants.json"));
        assert_eq!(config.record_store_url.as_deref(), Some("http://store.local/api"));
        assert_eq!(config.suggest_url, None);
        assert_eq!(config.tier_timeout_ms, 250);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PlannerConfig = serde_json::from_str(r#"{"tier_timeout_ms": 100}"#).unwrap();
        assert_eq!(config.tier_timeout_ms, 100);
        assert_eq!(config.remote_cache_capacity, 10_000);
    }
}
