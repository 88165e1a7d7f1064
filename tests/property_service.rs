use chrono::Utc;
use rental_scout::api::{PropertyQuery, PropertyService, RentPredictionRequest};
use rental_scout::filters::{self, FilterCriteria};
use rental_scout::geocode::{GeocodeClient, OneMapSource};
use rental_scout::{Coordinates, Property, SINGAPORE_CENTER};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listings() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "owner": 4,
            "title": "Cosy HDB near Hougang MRT",
            "block": "123",
            "street_name": "Hougang Ave 1",
            "location": "Hougang",
            "town": "Hougang",
            "city": "Singapore",
            "zip_code": "530123",
            "price": "2500.00",
            "bedrooms": 2,
            "bathrooms": 1,
            "square_feet": 850,
            "property_type": "HDB",
            "status": "available",
            "amenities": ["Wi-Fi", "Washing Machine"],
            "image": "",
            "created_at": "2025-04-01T09:30:00.123456Z"
        },
        {
            "id": 2,
            "title": "Marina view condo",
            "street_name": "Marina Boulevard",
            "location": "Marina Bay",
            "city": "Singapore",
            "zip_code": "018980",
            "price": 5200,
            "bedrooms": 3,
            "bathrooms": 2,
            "property_type": "Condo",
            "status": "available",
            "amenities": ["Wi-Fi", "Gym", "Swimming Pool"],
            "latitude": 1.2801,
            "longitude": 103.8545
        },
        {
            "id": 3,
            "title": "Room in Tampines",
            "street_name": "Unknown Lane",
            "location": "Tampines",
            "city": "Singapore",
            "price": "900.00",
            "bedrooms": 1,
            "bathrooms": 1,
            "property_type": "HDB",
            "status": "available",
            "amenities": ["Wi-Fi"]
        }
    ])
}

#[tokio::test]
async fn test_fetch_properties_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/properties/"))
        .and(query_param("search", "hougang"))
        .and(query_param("bedrooms", "2"))
        .and(query_param("types", "Condo,HDB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings()))
        .expect(1)
        .mount(&server)
        .await;

    let service = PropertyService::new(server.uri(), Duration::from_secs(5)).unwrap();
    let criteria = FilterCriteria::default()
        .with_search("hougang")
        .with_min_bedrooms(2)
        .with_property_type("HDB")
        .with_property_type("Condo");

    let properties = service
        .fetch_properties(&PropertyQuery::from_criteria(&criteria))
        .await
        .unwrap();

    assert_eq!(properties.len(), 3);
    assert_eq!(properties[0].price, 2500.0);
    assert!(properties[0].created_at.is_some());

    // local narrowing on top of whatever the backend returned
    let shown = filters::apply(&properties, &criteria);
    assert_eq!(shown.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
}

#[tokio::test]
async fn test_fetch_properties_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/properties/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = PropertyService::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = service
        .fetch_properties(&PropertyQuery::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_fetch_property_detail() {
    let server = MockServer::start().await;
    let detail = listings()[1].clone();
    Mock::given(method("GET"))
        .and(path("/property/details/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/property/details/99/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let service = PropertyService::new(server.uri(), Duration::from_secs(5)).unwrap();

    let property = service.fetch_property(2).await.unwrap();
    assert_eq!(property.title, "Marina view condo");
    assert_eq!(property.price, 5200.0);

    let err = service.fetch_property(99).await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_predict_rent_12_months() {
    let server = MockServer::start().await;
    let predicted: Vec<f64> = (0..12).map(|i| 2400.0 + 10.0 * i as f64).collect();
    Mock::given(method("POST"))
        .and(path("/advanced-features/predict-rent-12-months/"))
        .and(header("authorization", "Token abc123"))
        .and(body_json(json!({"town": "HOUGANG", "flat_type": "3-ROOM"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"predicted_rent": predicted})))
        .expect(1)
        .mount(&server)
        .await;

    let service = PropertyService::new(server.uri(), Duration::from_secs(5)).unwrap();
    let listing: Property = serde_json::from_value(listings()[0].clone()).unwrap();
    let request = RentPredictionRequest::for_property(&listing);

    let history = service
        .predict_rent_12_months(&request, Some("abc123"))
        .await
        .unwrap();

    assert_eq!(history.len(), 12);
    assert_eq!(history[0].month, Utc::now().date_naive().format("%b %Y").to_string());
    assert_eq!(history[0].price, 2400.0);
    assert_eq!(history[11].price, 2510.0);
}

#[tokio::test]
async fn test_predict_rent_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/advanced-features/predict-rent-12-months/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"predicted_rent": [2000.0]})))
        .mount(&server)
        .await;

    let service = PropertyService::new(server.uri(), Duration::from_secs(5)).unwrap();
    let history = service
        .predict_rent_12_months(&RentPredictionRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"town": "TAMPINES", "flat_type": "3-ROOM"}));
}

#[tokio::test]
async fn test_predict_rent_surfaces_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/advanced-features/predict-rent-12-months/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "unknown town"})))
        .mount(&server)
        .await;

    let service = PropertyService::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = service
        .predict_rent_12_months(&RentPredictionRequest::default(), None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown town"));
}

#[tokio::test]
async fn test_fetch_with_coordinates() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/properties/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings()))
        .mount(&backend)
        .await;

    let onemap = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("searchVal", "123 Hougang Ave 1, 530123, Singapore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "found": 1,
            "results": [{"LATITUDE": "1.3721", "LONGITUDE": "103.8932"}]
        })))
        .expect(1)
        .mount(&onemap)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("searchVal", "Unknown Lane, Singapore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"found": 0, "results": []})))
        .expect(1)
        .mount(&onemap)
        .await;

    let service = PropertyService::new(backend.uri(), Duration::from_secs(5)).unwrap();
    let source =
        OneMapSource::with_endpoint(format!("{}/search", onemap.uri()), Duration::from_secs(5)).unwrap();
    let geocoder = GeocodeClient::new(source);

    let located = service
        .fetch_with_coordinates(&PropertyQuery::default(), &geocoder)
        .await
        .unwrap();

    assert_eq!(located.iter().map(|p| p.property.id).collect::<Vec<_>>(), vec![1, 2, 3]);

    assert_eq!(located[0].coordinates, Coordinates::new(1.3721, 103.8932));
    assert!(located[0].resolved);

    // stored coordinates are used without a geocode call
    assert_eq!(located[1].coordinates, Coordinates::new(1.2801, 103.8545));
    assert!(located[1].resolved);

    assert_eq!(located[2].coordinates, SINGAPORE_CENTER);
    assert!(!located[2].resolved);
    assert_eq!(located[0].map_pin().image, "/placeholder.jpg");
}
