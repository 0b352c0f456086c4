use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Rows shown per page in every dashboard table.
pub const PAGE_SIZE: usize = 6;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the proxied REST backend, including the `/api` prefix.
    pub api_base: String,
    /// Per-request timeout; expiry surfaces as a network error.
    pub timeout_secs: u64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            api_base: try_load("LMSADMIND_API_BASE", "http://127.0.0.1:3001/api"),
            timeout_secs: try_load("LMSADMIND_TIMEOUT_SECS", "30"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| ())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
