//! Integration tests for `FacilityClient` using wiremock HTTP mocks.

use allclear_client::{ClientError, FacilityClient, FacilitySearch};
use allclear_core::{GeoPosition, SearchCriteria, SearchPayload};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> FacilityClient {
    FacilityClient::with_base_url(base_url, 5, "allclear-test/0.1")
        .expect("client construction should not fail")
}

fn criteria(value: serde_json::Value) -> SearchCriteria {
    serde_json::from_value(value).expect("criteria should deserialize")
}

fn records_body() -> serde_json::Value {
    json!({
        "records": [
            {
                "id": 2,
                "name": "Second Ranked But First Listed",
                "address": "200 Broadway",
                "city": "New York",
                "state": "NY",
                "hours": "8am - 4pm",
                "driveThru": true,
                "phone": "212-555-0101",
                "url": "https://two.example",
                "latitude": 40.71,
                "longitude": -74.0
            },
            {
                "id": 1,
                "name": "Neighborhood Clinic",
                "address": "1 Main St",
                "city": "Hoboken",
                "state": "NJ",
                "latitude": 40.74,
                "longitude": -74.03,
                "appointmentRequired": true
            }
        ]
    })
}

#[tokio::test]
async fn search_posts_origin_and_active_criteria_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .and(body_json(json!({
            "from": {"latitude": 40.71, "longitude": -74.0, "miles": 100},
            "symptom": "fever"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = SearchPayload::new(
        GeoPosition::new(40.71, -74.0),
        &criteria(json!({"symptom": "fever", "driveThru": "Any"})),
    );
    let records = client.search(&payload).await.expect("search should succeed");

    assert_eq!(records.len(), 2);
    // Backend order is preserved as-is.
    assert_eq!(records[0].id, "2");
    assert_eq!(records[1].id, "1");
    assert!(records[0].drive_thru);
    assert_eq!(records[1].extra.get("appointmentRequired"), Some(&json!(true)));
}

#[tokio::test]
async fn search_through_trait_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body()))
        .mount(&server)
        .await;

    let client: std::sync::Arc<dyn FacilitySearch> =
        std::sync::Arc::new(test_client(&server.uri()));
    let payload = SearchPayload::unfiltered(GeoPosition::new(40.71, -74.0));
    let records = client.search(&payload).await.expect("search should succeed");
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn missing_records_field_is_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = SearchPayload::unfiltered(GeoPosition::new(1.0, 2.0));
    let records = client.search(&payload).await.expect("search should succeed");
    assert!(records.is_empty());
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = SearchPayload::unfiltered(GeoPosition::new(1.0, 2.0));
    let err = client.search(&payload).await.unwrap_err();

    assert!(
        matches!(err, ClientError::UnexpectedStatus { status: 503, .. }),
        "expected 503, got: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = SearchPayload::unfiltered(GeoPosition::new(1.0, 2.0));
    let err = client.search(&payload).await.unwrap_err();

    assert!(matches!(err, ClientError::Deserialize { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn retry_policy_recovers_from_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let payload = SearchPayload::unfiltered(GeoPosition::new(1.0, 2.0));
    let records = client.search(&payload).await.expect("retry should recover");
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn default_client_does_not_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = SearchPayload::unfiltered(GeoPosition::new(1.0, 2.0));
    assert!(client.search(&payload).await.is_err());
}
