//! Twelve-month rent forecast for a listing.

use crate::models::Property;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Town sent when the listing does not name one
pub const DEFAULT_TOWN: &str = "TAMPINES";

/// Flat type sent when there is no listing to derive it from
pub const DEFAULT_FLAT_TYPE: &str = "3-ROOM";

/// Body of the rent prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentPredictionRequest {
    pub town: String,
    pub flat_type: String,
}

impl Default for RentPredictionRequest {
    fn default() -> Self {
        Self {
            town: DEFAULT_TOWN.to_string(),
            flat_type: DEFAULT_FLAT_TYPE.to_string(),
        }
    }
}

impl RentPredictionRequest {
    /// Town in upper case, flat type as total room count ("4-ROOM")
    pub fn for_property(property: &Property) -> Self {
        let town = property
            .town
            .as_deref()
            .map(str::trim)
            .filter(|town| !town.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| DEFAULT_TOWN.to_string());

        Self {
            town,
            flat_type: format!("{}-ROOM", property.bedrooms + property.bathrooms),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RentPredictionResponse {
    pub predicted_rent: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictionErrorBody {
    pub error: String,
}

/// One point of the forecast chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    /// e.g. "Jun 2025"
    pub month: String,
    pub price: f64,
}

/// Label each prediction with its month, starting from the month of `today`
pub fn price_history(predictions: &[f64], today: NaiveDate) -> Vec<PriceHistoryEntry> {
    predictions
        .iter()
        .enumerate()
        .filter_map(|(offset, &price)| {
            let date = today.checked_add_months(Months::new(offset as u32))?;
            Some(PriceHistoryEntry {
                month: date.format("%b %Y").to_string(),
                price,
            })
        })
        .collect()
}
