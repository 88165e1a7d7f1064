use crate::geocode::traits::GeocodeSource;
use crate::geocode::types::{GeocodeError, OneMapResponse};
use crate::models::Coordinates;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Public OneMap search endpoint (no token required)
pub const ONEMAP_SEARCH_URL: &str = "https://www.onemap.gov.sg/api/common/elastic/search";

/// Geocoder backed by Singapore's OneMap search API
pub struct OneMapSource {
    client: Client,
    endpoint: String,
}

impl OneMapSource {
    /// Create a source pointing at the public OneMap endpoint
    pub fn new() -> Result<Self> {
        Self::with_endpoint(ONEMAP_SEARCH_URL, Duration::from_secs(30))
    }

    /// Create a source against a custom endpoint (proxies, tests)
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GeocodeSource for OneMapSource {
    async fn search(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("searchVal", address),
                ("returnGeom", "Y"),
                ("getAddrDetails", "Y"),
            ])
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("OneMap returned status: {}", status);
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        debug!("OneMap answered {} bytes for {:?}", body.len(), address);

        let parsed: OneMapResponse = serde_json::from_str(&body)
            .map_err(|e| GeocodeError::MalformedPayload(e.to_string()))?;
        parsed.first_coordinates()
    }

    fn source_name(&self) -> &'static str {
        "OneMap"
    }
}
