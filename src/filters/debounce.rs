use std::time::Duration;
use tokio::sync::mpsc;

/// Quiet period used for the free-text search box
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Sending half: feed every keystroke / criteria change in here
#[derive(Debug, Clone)]
pub struct DebounceHandle<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> DebounceHandle<T> {
    /// Returns false once the receiving side is gone
    pub fn submit(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Receiving half: yields a value only after input has been quiet for a while
#[derive(Debug)]
pub struct Debouncer<T> {
    rx: mpsc::UnboundedReceiver<T>,
    quiet: Duration,
}

/// Create a connected handle/debouncer pair
pub fn debouncer<T>(quiet: Duration) -> (DebounceHandle<T>, Debouncer<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DebounceHandle { tx }, Debouncer { rx, quiet })
}

impl<T> Debouncer<T> {
    /// Wait for the next settled value.
    ///
    /// Each new submission restarts the quiet period; only the latest value is
    /// returned. A pending value is flushed when every handle is dropped.
    /// Returns `None` when the channel is closed with nothing pending.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;

        loop {
            tokio::select! {
                newer = self.rx.recv() => match newer {
                    Some(value) => latest = value,
                    None => return Some(latest),
                },
                _ = tokio::time::sleep(self.quiet) => return Some(latest),
            }
        }
    }
}
