use clap::Parser;
use serde_json::json;

use super::*;
use crate::search::{parse_criteria, parse_filter};
use crate::url::describe_query;

#[test]
fn parses_search_with_repeated_filters() {
    let cli = Cli::try_parse_from([
        "allclear-cli",
        "search",
        "--lat",
        "40.71",
        "--lng",
        "-74.0",
        "--filter",
        "symptom=fever",
        "--filter",
        "driveThru=Any",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Search {
            lat,
            lng,
            filters,
            unfiltered,
            json,
        } => {
            assert!((lat - 40.71).abs() < f64::EPSILON);
            assert!((lng + 74.0).abs() < f64::EPSILON);
            assert_eq!(filters, vec!["symptom=fever", "driveThru=Any"]);
            assert!(!unfiltered);
            assert!(!json);
        }
        other => panic!("expected search, got {other:?}"),
    }
}

#[test]
fn parses_mount_without_device_location() {
    let cli = Cli::try_parse_from(["allclear-cli", "mount", "--profile", "40.5,-73.9"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Mount {
            device: None,
            profile: Some(_),
            json: false
        }
    ));
}

#[test]
fn rejects_malformed_position() {
    assert!(Cli::try_parse_from(["allclear-cli", "mount", "--device", "north"]).is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["allclear-cli"]).is_err());
}

#[test]
fn filter_values_parse_scalars_and_keep_strings() {
    assert_eq!(parse_filter("driveThru=true").unwrap(), ("driveThru".to_owned(), json!(true)));
    assert_eq!(parse_filter("age= 42 ").unwrap(), ("age".to_owned(), json!(42)));
    assert_eq!(parse_filter("symptom=fever").unwrap(), ("symptom".to_owned(), json!("fever")));
    assert_eq!(parse_filter("note=").unwrap(), ("note".to_owned(), json!("")));
    assert!(parse_filter("no-equals").is_err());
    assert!(parse_filter("=value").is_err());
}

#[test]
fn criteria_from_filters_counts_only_active() {
    let criteria = parse_criteria(&[
        "symptom=fever".to_owned(),
        "driveThru=Any".to_owned(),
        "appointment=false".to_owned(),
    ])
    .unwrap();
    assert_eq!(criteria.len(), 3);
    assert_eq!(criteria.count_active(), 1);
}

#[test]
fn describe_query_reports_map_params() {
    let described = describe_query("?selection=Walk+In&utm=x");
    assert_eq!(described["selection"], json!("Walk In"));
    assert_eq!(described["search"], json!(null));
    assert_eq!(described["passthrough"], json!([["utm", "x"]]));
    assert_eq!(described["normalized"], json!("selection=Walk%20In&utm=x"));
}

fn test_config(api_base_url: String) -> allclear_core::AppConfig {
    allclear_core::AppConfig {
        env: allclear_core::Environment::Test,
        api_base_url,
        log_level: "info".to_owned(),
        request_timeout_secs: 5,
        user_agent: "allclear-cli-test".to_owned(),
        max_retries: 0,
        retry_backoff_base_ms: 0,
        map_idle_debounce_ms: 0,
        cancel_superseded: true,
        default_center: GeoPosition::new(40.714_27, -74.005_97),
        default_zoom: 12,
    }
}

#[tokio::test]
async fn search_command_settles_with_backend_results() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"id": 1, "name": "Clinic", "latitude": 40.7, "longitude": -74.0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(server.uri());
    search::run_search(
        &config,
        GeoPosition::new(40.71, -74.0),
        &["symptom=fever".to_owned()],
        false,
        true,
    )
    .await
    .expect("search should succeed");
}

#[tokio::test]
async fn search_command_reports_backend_failure() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/facilities/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = test_config(server.uri());
    let err = search::run_search(&config, GeoPosition::new(40.71, -74.0), &[], true, false)
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("search failed"), "got: {message}");
    assert!(message.ends_with("(transient; try again)"), "got: {message}");
}
