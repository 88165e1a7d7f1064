pub mod predict;

pub use predict::{price_history, PriceHistoryEntry, RentPredictionRequest};

use crate::filters::FilterCriteria;
use crate::geocode::{Clock, GeocodeClient, GeocodeOutcome, GeocodeSource};
use crate::models::{LocatedProperty, Property};
use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use predict::{PredictionErrorBody, RentPredictionResponse};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Backend host used when none is configured
pub const DEFAULT_API_HOST: &str = "http://localhost:8000";

const PROPERTIES_PATH: &str = "/app/properties/";
const DETAILS_PATH: &str = "/property/details";
const PREDICT_RENT_12_MONTHS_PATH: &str = "/advanced-features/predict-rent-12-months/";

/// Query parameters understood by the listings endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    /// Comma-separated property types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
    /// Comma-separated amenities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<String>,
}

impl PropertyQuery {
    /// Translate client-side criteria into server-side query parameters.
    /// Unrestricted clauses are left out.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let (min_price, max_price) = criteria.price_range;

        Self {
            search: Some(criteria.search_text.trim().to_string()).filter(|s| !s.is_empty()),
            min_price: Some(min_price).filter(|p| *p > 0.0),
            max_price: Some(max_price).filter(|p| p.is_finite()),
            bedrooms: Some(criteria.bedrooms).filter(|n| *n > 0),
            bathrooms: Some(criteria.bathrooms).filter(|n| *n > 0),
            types: join_sorted(criteria.property_types.iter()),
            amenities: join_sorted(criteria.amenities.iter()),
        }
    }
}

fn join_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Option<String> {
    let mut values: Vec<&str> = values.map(String::as_str).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    Some(values.join(","))
}

/// Client for the listings backend
pub struct PropertyService {
    client: Client,
    host: String,
}

impl PropertyService {
    /// `host` is the backend root, e.g. `http://localhost:8000`
    pub fn new(host: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch the listings matching `query`
    pub async fn fetch_properties(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
        let url = format!("{}{}", self.host, PROPERTIES_PATH);
        debug!("Fetching URL: {} with {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .context("Failed to fetch properties")?;

        if !response.status().is_success() {
            warn!("Backend returned status: {}", response.status());
            anyhow::bail!("Failed to fetch properties: {}", response.status());
        }

        let properties: Vec<Property> = response
            .json()
            .await
            .context("Failed to decode property list")?;
        info!("Fetched {} properties", properties.len());
        Ok(properties)
    }

    /// Fetch a single listing by id
    pub async fn fetch_property(&self, id: i64) -> Result<Property> {
        let url = format!("{}{}/{}/", self.host, DETAILS_PATH, id);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch property {}", id))?;

        if !response.status().is_success() {
            warn!("Backend returned status: {}", response.status());
            anyhow::bail!("Failed to fetch property {}: {}", id, response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to decode property {}", id))
    }

    /// Forecast monthly rent for the next twelve months.
    ///
    /// `token` is sent as `Authorization: Token <token>` when present.
    /// Entries are labelled from the current month onwards.
    pub async fn predict_rent_12_months(
        &self,
        request: &RentPredictionRequest,
        token: Option<&str>,
    ) -> Result<Vec<PriceHistoryEntry>> {
        let url = format!("{}{}", self.host, PREDICT_RENT_12_MONTHS_PATH);
        debug!("Posting to URL: {} with {:?}", url, request);

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = token {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("Token {}", token));
        }

        let response = builder
            .send()
            .await
            .context("Failed to request rent prediction")?;

        let status = response.status();
        if !status.is_success() {
            warn!("Backend returned status: {}", status);
            match response.json::<PredictionErrorBody>().await {
                Ok(body) => anyhow::bail!("Rent prediction failed ({}): {}", status, body.error),
                Err(_) => anyhow::bail!("Rent prediction failed: {}", status),
            }
        }

        let body: RentPredictionResponse = response
            .json()
            .await
            .context("Failed to decode rent prediction")?;
        info!("Received {} monthly rent predictions", body.predicted_rent.len());

        Ok(price_history(&body.predicted_rent, Utc::now().date_naive()))
    }

    /// Fetch listings and pin each one on the map.
    ///
    /// Backend-stored coordinates are used as-is; everything else is geocoded
    /// concurrently through the shared, throttled client. Unresolved addresses
    /// get the fallback pin and `resolved == false`.
    pub async fn fetch_with_coordinates<S, C>(
        &self,
        query: &PropertyQuery,
        geocoder: &GeocodeClient<S, C>,
    ) -> Result<Vec<LocatedProperty>>
    where
        S: GeocodeSource,
        C: Clock,
    {
        let properties = self.fetch_properties(query).await?;
        Ok(locate_all(properties, geocoder).await)
    }
}

/// Annotate properties with coordinates, preserving input order
pub async fn locate_all<S, C>(
    properties: Vec<Property>,
    geocoder: &GeocodeClient<S, C>,
) -> Vec<LocatedProperty>
where
    S: GeocodeSource,
    C: Clock,
{
    let located = join_all(properties.into_iter().map(|property| async move {
        if let Some(coordinates) = property.stored_coordinates() {
            return LocatedProperty {
                property,
                coordinates,
                resolved: true,
            };
        }

        let address = property.full_address();
        let outcome = geocoder.lookup(&address).await;
        if let GeocodeOutcome::Unresolved(reason) = &outcome {
            warn!("Geocoding failed for property {}: {}", property.id, reason);
        }

        LocatedProperty {
            resolved: outcome.is_resolved(),
            coordinates: outcome.or_fallback(),
            property,
        }
    }))
    .await;

    let unresolved = located.iter().filter(|p| !p.resolved).count();
    if unresolved > 0 {
        info!("{} of {} properties pinned at the fallback location", unresolved, located.len());
    }
    located
}
