use crate::geocode::traits::Clock;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum spacing between the starts of outbound requests.
///
/// The marker stays locked from the read until it is rewritten after the wait,
/// so concurrent callers queue behind each other instead of reading the same
/// stale marker and firing together.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a request may start, then mark it as started.
    /// Returns the instant recorded as the start of the request.
    pub async fn acquire<C>(&self, clock: &C) -> Instant
    where
        C: Clock + ?Sized,
    {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = clock.now().saturating_duration_since(previous);
            if elapsed < self.interval {
                let delay = self.interval - elapsed;
                debug!("Throttling geocode request for {:?}", delay);
                clock.sleep(delay).await;
            }
        }

        let started = clock.now();
        *last = Some(started);
        started
    }
}
