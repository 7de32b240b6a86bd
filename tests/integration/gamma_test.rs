//! Integration tests for Gamma market discovery

use chrono::NaiveDate;
use poly_majority::market::{GammaClient, GammaConfig, MarketQuery, MarketSource};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GammaClient {
    GammaClient::with_config(GammaConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn query(require_accepting: bool) -> MarketQuery {
    MarketQuery {
        days_ahead: 30,
        pad_days: 7,
        limit: 200,
        require_accepting,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

#[tokio::test]
async fn test_first_query_sends_window_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .and(query_param("closed", "false"))
        .and(query_param("acceptingOrders", "true"))
        .and(query_param("end_date_min", "2026-01-24T00:00:00Z"))
        .and(query_param("end_date_max", "2026-02-07T23:59:59Z"))
        .and(query_param("order", "endDate"))
        .and(query_param("ascending", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "1", "slug": "a", "outcomes": "[\"Yes\",\"No\"]" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let markets = client(&server).markets_due_in(&query(true), today()).await.unwrap();
    assert_eq!(markets.len(), 1);
    assert_eq!(markets[0].slug.as_deref(), Some("a"));
}

async fn mount_empty_then_wide(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/markets"))
        .and(query_param("closed", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .and(query_param_is_missing("closed"))
        .and(query_param_is_missing("acceptingOrders"))
        .and(query_param("end_date_min", "2026-01-17T00:00:00Z"))
        .and(query_param("end_date_max", "2026-02-14T23:59:59Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "slug": "open", "closed": false, "acceptingOrders": true },
            { "slug": "closed", "closed": true, "acceptingOrders": true },
            { "slug": "paused", "closed": false, "acceptingOrders": false },
        ])))
        .expect(1)
        .mount(server)
        .await;
}

fn slugs(markets: &[poly_majority::market::MarketRecord]) -> Vec<&str> {
    markets.iter().filter_map(|m| m.slug.as_deref()).collect()
}

#[tokio::test]
async fn test_empty_answer_retries_wider_and_filters_client_side() {
    let server = MockServer::start().await;
    mount_empty_then_wide(&server).await;

    let markets = client(&server).markets_due_in(&query(true), today()).await.unwrap();
    assert_eq!(slugs(&markets), vec!["open"]);
}

#[tokio::test]
async fn test_retry_keeps_paused_markets_when_not_required() {
    let server = MockServer::start().await;
    mount_empty_then_wide(&server).await;

    let markets = client(&server).markets_due_in(&query(false), today()).await.unwrap();
    assert_eq!(slugs(&markets), vec!["open", "paused"]);
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server)
        .markets_due_in(&query(true), today())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_wider_window_out_of_range_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .and(query_param("closed", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // The first window fits the calendar; doubling the pad does not
    let query = MarketQuery {
        pad_days: 60_000_000,
        ..query(true)
    };
    let err = client(&server).markets_due_in(&query, today()).await.unwrap_err();
    assert!(err.to_string().contains("discovery window out of range"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_window_out_of_range_sends_nothing() {
    let server = MockServer::start().await;
    let query = MarketQuery {
        days_ahead: u32::MAX,
        ..query(true)
    };
    assert!(client(&server).markets_due_in(&query, today()).await.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}

