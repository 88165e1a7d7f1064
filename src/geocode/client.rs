use crate::geocode::cache::GeocodeCache;
use crate::geocode::throttle::Throttle;
use crate::geocode::traits::{Clock, GeocodeSource, TokioClock};
use crate::geocode::types::{GeocodeError, GeocodeOutcome};
use crate::models::Coordinates;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Tuning knobs for [`GeocodeClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeSettings {
    /// Minimum spacing between the starts of outbound requests
    pub throttle_interval: Duration,
    /// Cached entries older than this are refreshed. `None` = never expire.
    pub cache_ttl: Option<Duration>,
    /// Maximum number of cached addresses
    pub cache_capacity: usize,
    /// Upper bound on a single call to the source
    pub request_timeout: Duration,
}

impl Default for GeocodeSettings {
    fn default() -> Self {
        Self {
            throttle_interval: Duration::from_millis(50),
            cache_ttl: Some(Duration::from_secs(24 * 60 * 60)),
            cache_capacity: 1024,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Caching, throttled front for a [`GeocodeSource`].
///
/// One instance owns its cache and throttle marker; share it (e.g. behind an
/// `Arc`) between every caller that should respect the same request rate.
pub struct GeocodeClient<S, C = TokioClock> {
    source: S,
    clock: C,
    cache: Mutex<GeocodeCache>,
    throttle: Throttle,
    request_timeout: Duration,
}

impl<S: GeocodeSource> GeocodeClient<S, TokioClock> {
    /// Create a client with default settings
    pub fn new(source: S) -> Self {
        Self::with_settings(source, GeocodeSettings::default())
    }

    /// Create a client with custom settings
    pub fn with_settings(source: S, settings: GeocodeSettings) -> Self {
        Self::with_clock(source, settings, TokioClock)
    }
}

impl<S: GeocodeSource, C: Clock> GeocodeClient<S, C> {
    pub fn with_clock(source: S, settings: GeocodeSettings, clock: C) -> Self {
        Self {
            source,
            clock,
            cache: Mutex::new(GeocodeCache::new(
                settings.cache_capacity,
                settings.cache_ttl,
            )),
            throttle: Throttle::new(settings.throttle_interval),
            request_timeout: settings.request_timeout,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve an address, reporting why it failed when it does.
    ///
    /// Cache hits return immediately with no throttle wait. Only successful
    /// resolutions are cached.
    pub async fn lookup(&self, address: &str) -> GeocodeOutcome {
        let key = address.trim();
        if key.is_empty() {
            return GeocodeOutcome::Unresolved(GeocodeError::EmptyAddress);
        }

        let cached = self.lock_cache().get(key, self.clock.now());
        if let Some(coordinates) = cached {
            debug!("Geocode cache hit for {:?}", key);
            return GeocodeOutcome::Resolved(coordinates);
        }

        self.throttle.acquire(&self.clock).await;
        debug!(
            "Geocoding {:?} via {}",
            key,
            self.source.source_name()
        );

        let result = match tokio::time::timeout(self.request_timeout, self.source.search(key)).await
        {
            Ok(result) => result,
            Err(_) => Err(GeocodeError::Timeout(self.request_timeout)),
        };

        match result {
            Ok(Some(coordinates)) => {
                self.lock_cache()
                    .insert(key.to_string(), coordinates, self.clock.now());
                GeocodeOutcome::Resolved(coordinates)
            }
            Ok(None) => GeocodeOutcome::Unresolved(GeocodeError::NoMatch),
            Err(e) => GeocodeOutcome::Unresolved(e),
        }
    }

    /// Like [`lookup`](Self::lookup), but gives up as soon as `cancel` completes
    pub async fn lookup_cancellable<F>(&self, address: &str, cancel: F) -> GeocodeOutcome
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            outcome = self.lookup(address) => outcome,
            _ = cancel => {
                debug!("Geocode lookup for {:?} cancelled", address.trim());
                GeocodeOutcome::Unresolved(GeocodeError::Cancelled)
            }
        }
    }

    /// Resolve an address, always producing a usable coordinate.
    ///
    /// Failures are logged and replaced by the Singapore centre pin.
    pub async fn resolve(&self, address: &str) -> Coordinates {
        let outcome = self.lookup(address).await;
        if let GeocodeOutcome::Unresolved(reason) = &outcome {
            warn!("Geocoding failed for address {:?}: {}", address, reason);
        }
        outcome.or_fallback()
    }

    /// Drop expired cache entries, returning how many were removed
    pub fn sweep_cache(&self) -> usize {
        let now = self.clock.now();
        self.lock_cache().sweep_expired(now)
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> MutexGuard<'_, GeocodeCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
