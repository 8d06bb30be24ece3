//! Runtime configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory. Variables already set in the environment win.

use std::env;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "docchat=info";

pub const BACKEND_URL_VAR: &str = "DOCCHAT_BACKEND_URL";
pub const LOG_FILTER_VAR: &str = "DOCCHAT_LOG";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Origin of the document QA backend, without a trailing slash.
    pub backend_url: String,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read configuration from the environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        // A missing .env is the common case outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Resolve configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend_url = lookup(BACKEND_URL_VAR)
            .map(|raw| normalize_base_url(&raw))
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let log_filter = lookup(LOG_FILTER_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|filter| !filter.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Self {
            backend_url,
            log_filter,
        }
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
