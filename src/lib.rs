pub mod api;
pub mod config;
pub mod filters;
pub mod geocode;
pub mod models;

pub use api::{PriceHistoryEntry, PropertyQuery, PropertyService, RentPredictionRequest};
pub use config::AppConfig;
pub use filters::FilterCriteria;
pub use geocode::{GeocodeClient, GeocodeOutcome, OneMapSource};
pub use models::{Coordinates, LocatedProperty, Property, SINGAPORE_CENTER};
