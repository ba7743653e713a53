//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use frightfate_narrative::application::NarrativeConfig;
use frightfate_oracle::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

use crate::error::AppError;

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind address.
    pub addr: SocketAddr,
    /// Gemini API key. `None` disables the oracle.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: String,
    /// Gemini API base URL.
    pub gemini_base_url: String,
    /// Origin allowed by CORS.
    pub cors_allowed_origin: String,
    /// Engine time budgets and sampling.
    pub narrative: NarrativeConfig,
}

impl ServerConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but unparseable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, so tests need not touch the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(&lookup, "PORT", 8000)?;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        let narrative = NarrativeConfig::with_budgets(
            Duration::from_secs(parse_or(&lookup, "SCENARIO_TIMEOUT_SECS", 30)?),
            Duration::from_secs(parse_or(&lookup, "ANALYSIS_TIMEOUT_SECS", 20)?),
            Duration::from_secs(parse_or(&lookup, "RESULTS_TIMEOUT_SECS", 25)?),
        );

        Ok(Self {
            addr,
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            narrative,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_nothing_is_set() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.addr.port(), 8000);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.cors_allowed_origin, "http://localhost:5173");
        assert_eq!(config.narrative, NarrativeConfig::default());
    }

    #[test]
    fn test_overrides_are_read() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9100"),
            ("GEMINI_API_KEY", "key"),
            ("ANALYSIS_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.addr.to_string(), "127.0.0.1:9100");
        assert_eq!(config.gemini_api_key.as_deref(), Some("key"));
        assert_eq!(config.narrative.analysis_budget, Duration::from_secs(5));
        assert_eq!(config.narrative.scenario_budget, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_api_key_disables_oracle() {
        let config = ServerConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap();

        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_unparseable_port_is_a_config_error() {
        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));

        assert!(matches!(result, Err(AppError::Config(message)) if message.contains("PORT")));
    }
}
