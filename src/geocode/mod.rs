pub mod cache;
pub mod client;
pub mod onemap;
pub mod throttle;
pub mod traits;
pub mod types;

pub use cache::GeocodeCache;
pub use client::{GeocodeClient, GeocodeSettings};
pub use onemap::{OneMapSource, ONEMAP_SEARCH_URL};
pub use throttle::Throttle;
pub use traits::{Clock, GeocodeSource, TokioClock};
pub use types::{GeocodeError, GeocodeOutcome};
