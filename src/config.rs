//! Connection settings for the Santuri API.
//!
//! Settings come from the process environment:
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `SANTURI_API_KEY` | no | anonymous, rate-limited access |
//! | `SANTURI_API_URL` | no | `https://santuri.io` |
//! | `SANTURI_STACK_ID` | no | search all sources |
//! | `SANTURI_TIMEOUT_SECS` | no | `30` |
//!
//! [`get_config`] reads the environment once and caches the result for the
//! lifetime of the process. Everything below the binary entry point receives
//! the resolved [`ApiConfig`] as an argument instead of reaching for the cache.

use std::sync::{Arc, RwLock};

pub const DEFAULT_API_URL: &str = "https://santuri.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "SANTURI_API_KEY";
pub const ENV_API_URL: &str = "SANTURI_API_URL";
pub const ENV_STACK_ID: &str = "SANTURI_STACK_ID";
pub const ENV_TIMEOUT_SECS: &str = "SANTURI_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Bearer credential. `None` means anonymous mode.
    pub api_key: Option<String>,
    /// Base endpoint, without a trailing slash.
    pub api_url: String,
    /// Stack that scopes search and listing. `None` means all sources.
    pub stack_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            stack_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get(ENV_API_URL)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "{} is not a positive integer, using {}s",
                        ENV_TIMEOUT_SECS,
                        DEFAULT_TIMEOUT_SECS
                    );
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            api_key: get(ENV_API_KEY),
            api_url,
            stack_id: get(ENV_STACK_ID),
            timeout_secs,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    /// Human-readable scope used in rendered output: `stack <id>` or `all sources`.
    pub fn scope_description(&self) -> String {
        scope_description(self.stack_id.as_deref())
    }
}

pub fn scope_description(stack_id: Option<&str>) -> String {
    match stack_id {
        Some(id) => format!("stack {}", id),
        None => "all sources".to_string(),
    }
}

static CACHED: RwLock<Option<Arc<ApiConfig>>> = RwLock::new(None);

/// Return the process-wide config, reading the environment on first use.
pub fn get_config() -> Arc<ApiConfig> {
    if let Some(cfg) = CACHED.read().unwrap_or_else(|e| e.into_inner()).as_ref() {
        return cfg.clone();
    }

    let mut slot = CACHED.write().unwrap_or_else(|e| e.into_inner());
    // Another thread may have filled the slot while we waited for the lock.
    slot.get_or_insert_with(|| Arc::new(ApiConfig::from_env()))
        .clone()
}

/// Drop the cached config so the next [`get_config`] re-reads the environment.
pub fn clear_config_cache() {
    *CACHED.write().unwrap_or_else(|e| e.into_inner()) = None;
}
