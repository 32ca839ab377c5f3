use std::env;
use std::time::Duration;

use tracing::warn;

use crate::api_connection::endpoints::DEFAULT_MODEL;

pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const ORACLE_ENV_VAR: &str = "APPETITE_ORACLE";
pub const MODEL_ENV_VAR: &str = "APPETITE_MODEL";
pub const TIMEOUT_ENV_VAR: &str = "APPETITE_ORACLE_TIMEOUT_SECS";
pub const SEED_ENV_VAR: &str = "APPETITE_SEED";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleBackend {
    OpenRouter,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub backend: OracleBackend,
    pub api_key_env_var: String,
    pub model: String,
    pub oracle_timeout: Duration,
    /// Seed for fallback title templates. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            backend: OracleBackend::OpenRouter,
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            oracle_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            seed: None,
        }
    }
}

impl GeneratorSettings {
    /// Reads settings from the environment (after loading `.env`). Bad values are
    /// logged and replaced with defaults rather than rejected.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let backend = match lookup(ORACLE_ENV_VAR).map(|v| v.trim().to_lowercase()) {
            None => defaults.backend,
            Some(v) if v.is_empty() || v == "openrouter" => OracleBackend::OpenRouter,
            Some(v) if v == "none" || v == "off" || v == "fallback" => OracleBackend::Disabled,
            Some(other) => {
                warn!(value = %other, "Unknown {}, disabling the oracle", ORACLE_ENV_VAR);
                OracleBackend::Disabled
            }
        };

        let model = lookup(MODEL_ENV_VAR)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or(defaults.model);

        let oracle_timeout = match lookup(TIMEOUT_ENV_VAR) {
            None => defaults.oracle_timeout,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        value = %raw,
                        "Invalid {}, using {}s", TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS
                    );
                    defaults.oracle_timeout
                }
            },
        };

        let seed = lookup(SEED_ENV_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!(value = %raw, "Invalid {}, seeding from entropy", SEED_ENV_VAR);
                None
            }
        });

        Self {
            backend,
            api_key_env_var: defaults.api_key_env_var,
            model,
            oracle_timeout,
            seed,
        }
    }
}
