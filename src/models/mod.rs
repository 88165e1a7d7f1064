use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Geographic centre of Singapore, used whenever an address cannot be resolved
pub const SINGAPORE_CENTER: Coordinates = Coordinates {
    latitude: 1.3521,
    longitude: 103.8198,
};

/// Image shown on map pins for listings without a photo
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

/// Listings created within this many days are flagged as new
const NEW_LISTING_DAYS: i64 = 7;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when this is the fallback pin rather than a real resolution
    pub fn is_fallback(&self) -> bool {
        *self == SINGAPORE_CENTER
    }
}

/// Rental listing as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: i64,
    #[serde(default)]
    pub owner: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(deserialize_with = "de_price")]
    pub price: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub square_feet: u32,
    #[serde(default, alias = "type")]
    pub property_type: String,
    /// Entire place / private room / shared room, when the listing says
    #[serde(default)]
    pub place_type: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Address string handed to the geocoder.
    ///
    /// Uses the explicit `address` when present, otherwise block + street name,
    /// followed by the postal code and a country suffix. Missing parts are skipped.
    pub fn full_address(&self) -> String {
        let street = match self.address.as_deref().map(str::trim) {
            Some(addr) if !addr.is_empty() => addr.to_string(),
            _ => match self.block.as_deref().map(str::trim) {
                Some(block) if !block.is_empty() => {
                    format!("{} {}", block, self.street_name.trim())
                }
                _ => self.street_name.trim().to_string(),
            },
        };

        let mut parts = Vec::with_capacity(3);
        if !street.is_empty() {
            parts.push(street);
        }
        if let Some(zip) = self.zip_code.as_deref().map(str::trim) {
            if !zip.is_empty() {
                parts.push(zip.to_string());
            }
        }
        parts.push("Singapore".to_string());
        parts.join(", ")
    }

    /// Coordinates already stored on the listing by the backend
    pub fn stored_coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// Whether the listing was created in the last week
    pub fn is_new(&self, now: DateTime<Utc>) -> bool {
        self.created_at
            .map(|created| created > now - Duration::days(NEW_LISTING_DAYS))
            .unwrap_or(false)
    }
}

/// A property annotated with a map coordinate
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocatedProperty {
    #[serde(flatten)]
    pub property: Property,
    pub coordinates: Coordinates,
    /// False when `coordinates` is the fallback pin
    pub resolved: bool,
}

impl LocatedProperty {
    pub fn map_pin(&self) -> MapPin {
        MapPin {
            id: self.property.id,
            title: self.property.title.clone(),
            price: self.property.price,
            location: self.property.location.clone(),
            coordinates: self.coordinates,
            image: self
                .property
                .image
                .clone()
                .filter(|img| !img.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

/// Compact projection rendered as a marker on the map view
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapPin {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub location: String,
    pub coordinates: Coordinates,
    pub image: String,
}

/// The backend serialises decimal prices as strings ("2500.00")
fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    let price = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => n,
        RawPrice::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid price {:?}: {}", s, e)))?,
    };

    if !price.is_finite() {
        return Err(serde::de::Error::custom(format!("price must be finite, got {}", price)));
    }
    Ok(price)
}
