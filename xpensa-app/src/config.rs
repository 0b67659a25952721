//! Configuration loading from environment.

use std::env;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT: u32 = 100;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Base URL of the assistant backend. The assistant endpoint answers 503 without it.
    pub assistant_url: Option<String>,
    pub rate_limit_per_minute: u32,
    /// OTLP collector endpoint. Spans are only exported when set.
    pub otel_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a port number, got {:?}", v))?,
            None => DEFAULT_PORT,
        };

        let rate_limit_per_minute = match non_empty("RATE_LIMIT_PER_MINUTE") {
            Some(v) => v.parse().map_err(|_| {
                anyhow::anyhow!("RATE_LIMIT_PER_MINUTE must be a positive integer, got {:?}", v)
            })?,
            None => DEFAULT_RATE_LIMIT,
        };

        Ok(Self {
            port,
            database_url: non_empty("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            assistant_url: non_empty("ASSISTANT_URL"),
            rate_limit_per_minute,
            otel_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "sqlite://xpensa.db")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.rate_limit_per_minute, 100);
        assert!(config.assistant_url.is_none());
        assert!(config.otel_endpoint.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "memory://"),
            ("ASSISTANT_URL", "http://localhost:5000"),
            ("RATE_LIMIT_PER_MINUTE", "10"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "memory://");
        assert_eq!(config.assistant_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.rate_limit_per_minute, 10);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = load(&[
            ("DATABASE_URL", "memory://"),
            ("ASSISTANT_URL", "  "),
            ("PORT", ""),
        ])
        .unwrap();
        assert!(config.assistant_url.is_none());
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_missing_database_url_is_rejected() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let db = ("DATABASE_URL", "memory://");
        assert!(load(&[db, ("PORT", "eighty")]).is_err());
        assert!(load(&[db, ("RATE_LIMIT_PER_MINUTE", "-1")]).is_err());
    }
}
