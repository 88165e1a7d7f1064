use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use rental_scout::api::{locate_all, PropertyQuery, PropertyService, RentPredictionRequest};
use rental_scout::filters::{self, FilterCriteria};
use rental_scout::geocode::{GeocodeClient, OneMapSource};
use rental_scout::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Browse rental listings from the command line
#[derive(Debug, Parser)]
#[command(name = "rental-scout", version)]
struct Cli {
    /// Free-text search on title and location
    #[arg(short, long)]
    search: Option<String>,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    /// Minimum number of bedrooms
    #[arg(long, default_value_t = 0)]
    bedrooms: u32,

    /// Minimum number of bathrooms
    #[arg(long, default_value_t = 0)]
    bathrooms: u32,

    /// Property type (repeatable), e.g. HDB, Condo
    #[arg(long = "type")]
    types: Vec<String>,

    /// Required amenity (repeatable), e.g. "Wi-Fi"
    #[arg(long = "amenity")]
    amenities: Vec<String>,

    /// Place type (repeatable), e.g. "Entire Place"
    #[arg(long = "place-type")]
    place_types: Vec<String>,

    /// Geocode listings for the map view
    #[arg(long)]
    map: bool,

    /// Show a 12-month rent forecast for this listing id instead of searching
    #[arg(long, value_name = "ID")]
    forecast: Option<i64>,

    /// Write the filtered listings to this JSON file
    #[arg(short, long)]
    output: Option<String>,
}

impl Cli {
    fn criteria(&self) -> FilterCriteria {
        let defaults = FilterCriteria::default();
        FilterCriteria {
            property_types: self.types.iter().cloned().collect(),
            price_range: (
                self.min_price.unwrap_or(defaults.price_range.0),
                self.max_price.unwrap_or(defaults.price_range.1),
            ),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            amenities: self.amenities.iter().cloned().collect(),
            place_types: self.place_types.iter().cloned().collect(),
            search_text: self.search.clone().unwrap_or_default(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let criteria = cli.criteria();

    info!("🏠 Rental Scout");
    info!("Backend: {}", config.api_host);

    let service = PropertyService::new(&config.api_host, config.http_timeout)?;

    if let Some(id) = cli.forecast {
        let property = service.fetch_property(id).await?;
        let request = RentPredictionRequest::for_property(&property);
        info!("📈 Forecasting rent for {} ({}, {})", property.title, request.town, request.flat_type);

        let history = service
            .predict_rent_12_months(&request, config.api_token.as_deref())
            .await?;
        for entry in &history {
            println!("{}  ${:.0}", entry.month, entry.price);
        }
        return Ok(());
    }
    let fetched = service
        .fetch_properties(&PropertyQuery::from_criteria(&criteria))
        .await?;

    // The backend may ignore some parameters, so narrow again locally
    let properties = filters::apply(&fetched, &criteria);
    info!("Show {} properties", properties.len());

    let now = Utc::now();
    for (i, property) in properties.iter().enumerate() {
        let badge = if property.is_new(now) { " [NEW]" } else { "" };
        println!("{}. {} (${:.0}/month){}", i + 1, property.title, property.price, badge);
        println!(
            "   {} · {} bed, {} bath, {} sqft",
            property.property_type, property.bedrooms, property.bathrooms, property.square_feet
        );
        println!("   {}", property.full_address());
        if !property.amenities.is_empty() {
            println!("   Amenities: {}", property.amenities.join(", "));
        }
        println!();
    }

    let json = if cli.map {
        let source = OneMapSource::with_endpoint(&config.onemap_search_url, config.http_timeout)?;
        let geocoder = GeocodeClient::with_settings(source, config.geocode.clone());

        info!("Geocoding {} properties...", properties.len());
        let located = locate_all(properties, &geocoder).await;
        for pin in located.iter().map(|p| p.map_pin()) {
            println!(
                "📍 {} @ {:.4}, {:.4}",
                pin.title, pin.coordinates.latitude, pin.coordinates.longitude
            );
        }
        serde_json::to_string_pretty(&located)?
    } else {
        serde_json::to_string_pretty(&properties)?
    };

    if let Some(path) = &cli.output {
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path))?;
        info!("💾 Saved listings to {}", path);
    }

    Ok(())
}
