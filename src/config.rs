use crate::api::DEFAULT_API_HOST;
use crate::geocode::{GeocodeSettings, ONEMAP_SEARCH_URL};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Runtime configuration, read from the environment.
/// Falls back to development defaults for anything unset.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend root, e.g. `http://localhost:8000`
    pub api_host: String,
    /// Token for authenticated backend endpoints
    pub api_token: Option<String>,
    /// OneMap search endpoint
    pub onemap_search_url: String,
    /// Timeout for backend and geocoder HTTP clients
    pub http_timeout: Duration,
    pub geocode: GeocodeSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            api_token: None,
            onemap_search_url: ONEMAP_SEARCH_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            geocode: GeocodeSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_ttl = match parse_or(&lookup, "GEOCODE_CACHE_TTL_SECS", 24 * 60 * 60u64) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            api_host: lookup("RENTAL_API_HOST").unwrap_or(defaults.api_host),
            api_token: lookup("RENTAL_API_TOKEN").filter(|token| !token.trim().is_empty()),
            onemap_search_url: lookup("ONEMAP_SEARCH_URL").unwrap_or(defaults.onemap_search_url),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)),
            geocode: GeocodeSettings {
                throttle_interval: Duration::from_millis(parse_or(
                    &lookup,
                    "GEOCODE_THROTTLE_MS",
                    50,
                )),
                cache_ttl,
                cache_capacity: parse_or(&lookup, "GEOCODE_CACHE_CAPACITY", 1024),
                request_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "GEOCODE_TIMEOUT_SECS",
                    10,
                )),
            },
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {}={:?}, using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}
