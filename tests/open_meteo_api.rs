//! Contract tests for the Open-Meteo archive client against a mock server.

use chrono::NaiveDate;
use std::time::Duration;
use weather_trends::{Config, FetchError, OpenMeteoClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn archive_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 40.1811,
        "longitude": 44.5136,
        "timezone": "Asia/Yerevan",
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "precipitation_sum": "mm"
        },
        "daily": {
            "time": ["2025-01-01", "2025-01-02", "2025-01-03"],
            "temperature_2m_max": [4.0, 6.0, null],
            "temperature_2m_min": [-2.0, 0.0, -1.0],
            "precipitation_sum": [0.0, 5.5, 1.2]
        }
    })
}

fn test_config(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        timeout_secs: 5,
        ..Config::default()
    }
}

async fn mount_archive(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

async fn fetch_range(
    config: &Config,
) -> Result<polars::prelude::DataFrame, FetchError> {
    let client = OpenMeteoClient::new(config)?;
    client
        .fetch_daily()
        .location(config.location)
        .start_date(date(2025, 1, 1))
        .end_date(date(2025, 1, 3))
        .timezone(&config.timezone)
        .call()
        .await
}

#[tokio::test]
async fn test_fetch_daily_normalizes_response() {
    let server = MockServer::start().await;
    mount_archive(
        &server,
        ResponseTemplate::new(200).set_body_json(archive_body()),
    )
    .await;

    let table = fetch_range(&test_config(&server)).await.unwrap();
    assert_eq!(table.height(), 3);
    assert_eq!(
        table.get_column_names_str(),
        ["date", "temperature", "rainfall"]
    );

    let temperature = table.column("temperature").unwrap().f64().unwrap();
    assert_eq!(temperature.get(0), Some(1.0));
    assert_eq!(temperature.get(1), Some(3.0));
    // A day with a missing extreme stays missing.
    assert_eq!(temperature.get(2), None);

    let rainfall = table.column("rainfall").unwrap().f64().unwrap();
    assert_eq!(rainfall.get(1), Some(5.5));
}

#[tokio::test]
async fn test_fetch_daily_sends_archive_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("latitude", "40.1811"))
        .and(query_param("longitude", "44.5136"))
        .and(query_param("start_date", "2025-01-01"))
        .and(query_param("end_date", "2025-01-03"))
        .and(query_param(
            "daily",
            "temperature_2m_max,temperature_2m_min,precipitation_sum",
        ))
        .and(query_param("timezone", "Asia/Yerevan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetch_range(&test_config(&server)).await;
    assert!(result.is_ok(), "expected success, got {result:?}");
}

#[tokio::test]
async fn test_missing_daily_block_is_data_unavailable() {
    let server = MockServer::start().await;
    let mut body = archive_body();
    body.as_object_mut().unwrap().remove("daily");
    mount_archive(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let err = fetch_range(&test_config(&server)).await.unwrap_err();
    assert!(matches!(err, FetchError::DataUnavailable));
}

#[tokio::test]
async fn test_server_error_is_http_status() {
    let server = MockServer::start().await;
    mount_archive(
        &server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let err = fetch_range(&test_config(&server)).await.unwrap_err();
    assert!(
        matches!(err, FetchError::HttpStatus { status, .. } if status.as_u16() == 500),
        "expected HttpStatus, got {err:?}"
    );
}

#[tokio::test]
async fn test_undecodable_body_is_decode_error() {
    let server = MockServer::start().await;
    mount_archive(
        &server,
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;

    let err = fetch_range(&test_config(&server)).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_misaligned_series_is_rejected() {
    let server = MockServer::start().await;
    let mut body = archive_body();
    body["daily"]["precipitation_sum"] = serde_json::json!([0.0, 5.5]);
    mount_archive(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let err = fetch_range(&test_config(&server)).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::MisalignedSeries {
            expected: 3,
            found: 2,
            ..
        }
    ));
}

#[tokio::test]
async fn test_non_iso_dates_are_rejected() {
    let server = MockServer::start().await;
    let mut body = archive_body();
    body["daily"]["time"][1] = serde_json::json!("02/01/2025");
    mount_archive(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let err = fetch_range(&test_config(&server)).await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidDate(raw, _) if raw == "02/01/2025"));
}

#[tokio::test]
async fn test_timeout_surfaces_as_transport_error() {
    let server = MockServer::start().await;
    mount_archive(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(archive_body())
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let config = Config {
        timeout_secs: 1,
        ..test_config(&server)
    };
    let err = fetch_range(&config).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_, _)));
}
