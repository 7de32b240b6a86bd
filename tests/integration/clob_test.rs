//! Integration tests for the CLOB quote client

use poly_majority::quote::{ClobClient, ClobConfig, QuoteSource};
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ClobClient {
    ClobClient::with_config(ClobConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        single_timeout: Duration::from_secs(2),
    })
    .unwrap()
}

fn ids() -> Vec<String> {
    vec!["t1".to_string(), "t2".to_string()]
}

#[tokio::test]
async fn test_prices_fall_back_to_bare_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prices"))
        .and(body_string_contains("params"))
        .respond_with(ResponseTemplate::new(400))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/prices"))
        .and(body_json(json!([
            { "token_id": "t1", "side": "BUY" },
            { "token_id": "t1", "side": "SELL" },
            { "token_id": "t2", "side": "BUY" },
            { "token_id": "t2", "side": "SELL" },
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "t1": { "BUY": "0.61", "SELL": "0.63" },
            "t2": { "BUY": "0.30" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/midpoints"))
        .and(body_json(json!({ "params": ["t1", "t2"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "t1": { "mid": "0.62" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quotes = client(&server).bulk_quotes(&ids()).await.unwrap();
    assert_eq!(quotes["t1"].best_buy, Some(dec!(0.61)));
    assert_eq!(quotes["t1"].best_sell, Some(dec!(0.63)));
    assert_eq!(quotes["t1"].midpoint, Some(dec!(0.62)));
    assert_eq!(quotes["t2"].best_buy, Some(dec!(0.30)));
    assert_eq!(quotes["t2"].midpoint, None);
}

#[tokio::test]
async fn test_list_shaped_prices_and_midpoint_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "token_id": "t1", "side": "BUY", "price": "0.45" },
            { "token_id": "t1", "side": "SELL", "price": "0.47" },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/midpoints"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let quotes = client(&server).bulk_quotes(&ids()).await.unwrap();
    assert_eq!(quotes["t1"].best_sell, Some(dec!(0.47)));
    assert_eq!(quotes["t1"].midpoint, None);
}

#[tokio::test]
async fn test_prices_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client(&server).bulk_quotes(&ids()).await.is_err());
}

#[tokio::test]
async fn test_single_quote_legs_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/price"))
        .and(query_param("token_id", "t1"))
        .and(query_param("side", "BUY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "price": "0.70" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/price"))
        .and(query_param("token_id", "t1"))
        .and(query_param("side", "SELL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "price": "1.70" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/midpoint"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let quote = client(&server).single_quote("t1").await;
    assert_eq!(quote.best_buy, Some(dec!(0.70)));
    assert_eq!(quote.best_sell, None);
    assert_eq!(quote.midpoint, None);
}
