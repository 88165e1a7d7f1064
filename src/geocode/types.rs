use crate::models::{Coordinates, SINGAPORE_CENTER};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Why an address could not be turned into coordinates
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("address is empty")]
    EmptyAddress,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("geocoding service returned status {0}")]
    Status(u16),

    #[error("geocoding request timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed geocoding payload: {0}")]
    MalformedPayload(String),

    #[error("no match for address")]
    NoMatch,

    #[error("lookup cancelled")]
    Cancelled,
}

/// Result of a geocode lookup. Callers choose their own fallback policy.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Resolved(Coordinates),
    Unresolved(GeocodeError),
}

impl GeocodeOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Resolved(coords) => Some(*coords),
            Self::Unresolved(_) => None,
        }
    }

    /// Resolved coordinates, or the Singapore centre pin
    pub fn or_fallback(&self) -> Coordinates {
        self.coordinates().unwrap_or(SINGAPORE_CENTER)
    }
}

/// Response body of the OneMap elastic search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OneMapResponse {
    #[serde(default)]
    pub found: u32,
    #[serde(default)]
    pub results: Vec<OneMapResult>,
}

/// One search hit. OneMap encodes every number as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct OneMapResult {
    #[serde(rename = "SEARCHVAL", default)]
    pub search_value: Option<String>,
    #[serde(rename = "ADDRESS", default)]
    pub address: Option<String>,
    #[serde(rename = "POSTAL", default)]
    pub postal: Option<String>,
    #[serde(rename = "LATITUDE")]
    pub latitude: String,
    #[serde(rename = "LONGITUDE")]
    pub longitude: String,
}

impl OneMapResponse {
    /// Coordinates of the first hit, `None` when there are no hits
    pub fn first_coordinates(&self) -> Result<Option<Coordinates>, GeocodeError> {
        let Some(first) = self.results.first() else {
            return Ok(None);
        };

        let latitude = parse_coordinate("LATITUDE", &first.latitude)?;
        let longitude = parse_coordinate("LONGITUDE", &first.longitude)?;
        Ok(Some(Coordinates::new(latitude, longitude)))
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, GeocodeError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| GeocodeError::MalformedPayload(format!("{} {:?}: {}", field, raw, e)))?;

    if !value.is_finite() {
        return Err(GeocodeError::MalformedPayload(format!(
            "{} {:?} is not a finite number",
            field, raw
        )));
    }
    Ok(value)
}
