use crate::geocode::types::GeocodeError;
use crate::models::Coordinates;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// An external service that turns an address into coordinates.
/// `Ok(None)` means the service answered but had no match.
#[async_trait]
pub trait GeocodeSource: Send + Sync {
    async fn search(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;

    /// Get the name of the geocoding source
    fn source_name(&self) -> &'static str;
}

/// Time source for throttling and cache expiry
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer. Honours `tokio::time::pause` in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
