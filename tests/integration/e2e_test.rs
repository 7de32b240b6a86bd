//! End-to-end tests: evaluation examples and a full scan against mock APIs

use chrono::NaiveDate;
use poly_majority::engine::{evaluate_market, BatchReport, EvalConfig, Pick, Side};
use poly_majority::market::{GammaClient, GammaConfig, MarketQuery};
use poly_majority::quote::{ClobClient, ClobConfig, QuoteSignal, ResolutionTier};
use poly_majority::scan::{ScanOptions, Scanner};
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_favourite_yes_at_62() {
    let result =
        evaluate_market("Will X happen?", dec!(62), None, dec!(100), &EvalConfig::default()).unwrap();
    assert_eq!(result.side, Pick::Yes);
    assert_eq!(result.chosen_price, Some(dec!(0.62)));
    assert_eq!(result.win_prob_of_chosen, Some(dec!(0.9)));
    assert_eq!(result.win_payout_if_correct, dec!(161.29));
    assert_eq!(result.lose_payout_if_wrong, dec!(0));
}

#[test]
fn test_coin_flip_breaks_toward_yes() {
    let result =
        evaluate_market("Coin flip", dec!(50), Some(dec!(50)), dec!(10), &EvalConfig::default())
            .unwrap();
    assert_eq!(result.q_yes_calibrated, dec!(0.5));
    assert_eq!(result.side, Pick::Yes);
}

#[test]
fn test_batch_summary_excludes_holds_from_all_win() {
    let strict = EvalConfig {
        min_ev: dec!(0.5),
        ..EvalConfig::default()
    };
    let report: BatchReport = [
        evaluate_market("A", dec!(0.62), None, dec!(100), &EvalConfig::default()).unwrap(),
        evaluate_market("B", dec!(0.5), None, dec!(10), &strict).unwrap(),
    ]
    .into_iter()
    .collect();

    let totals = report.totals();
    assert_eq!(totals.total_stake, dec!(110));
    assert_eq!(totals.total_win_all, Some(dec!(161.29)));
    assert_eq!(totals.profit_all_win, Some(dec!(51.29)));
}

#[tokio::test]
async fn test_scan_against_mock_apis() {
    let gamma_server = MockServer::start().await;
    let clob_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1, "slug": "bulk", "question": "Bulk quoted?",
                "outcomes": "[\"Yes\", \"No\"]",
                "clobTokenIds": "[\"y1\", \"n1\"]"
            },
            {
                "id": 2, "slug": "single", "question": "Single quoted?",
                "outcomes": ["No", "Yes"],
                "clobTokenIds": ["n2", "y2"]
            },
            {
                "id": 3, "slug": "multi", "question": "Who wins?",
                "outcomes": ["A", "B", "C"]
            }
        ])))
        .mount(&gamma_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "y1": { "BUY": "0.20", "SELL": "0.24" }
        })))
        .mount(&clob_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/midpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&clob_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/price"))
        .and(query_param("token_id", "y2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&clob_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/midpoint"))
        .and(query_param("token_id", "y2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&clob_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/price"))
        .and(query_param("token_id", "n2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&clob_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/midpoint"))
        .and(query_param("token_id", "n2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mid": "0.35" })))
        .mount(&clob_server)
        .await;

    let gamma = GammaClient::with_config(GammaConfig {
        base_url: gamma_server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let clob = ClobClient::with_config(ClobConfig {
        base_url: clob_server.uri(),
        timeout: Duration::from_secs(5),
        single_timeout: Duration::from_secs(2),
    })
    .unwrap();
    let scanner = Scanner::new(gamma, clob, EvalConfig::default());
    let opts = ScanOptions {
        query: MarketQuery {
            days_ahead: 30,
            pad_days: 7,
            limit: 200,
            require_accepting: true,
        },
        concurrency: 4,
        stake: Some(dec!(100)),
    };

    let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let report = scanner.run(&opts, today).await.unwrap();

    assert_eq!(report.count, 2);

    let bulk = &report.markets[0];
    assert_eq!(bulk.q_yes_mid, Some(dec!(0.22)));
    assert_eq!(
        bulk.resolution_tier,
        Some(ResolutionTier::BulkYes(QuoteSignal::BuySellMean))
    );
    assert_eq!(bulk.majority_side, Some(Side::No));
    assert_eq!(bulk.evaluation.as_ref().map(|e| e.side), Some(Pick::No));

    let single = &report.markets[1];
    assert_eq!(single.yes.token_id.as_deref(), Some("y2"));
    assert_eq!(single.q_yes_mid, Some(dec!(0.65)));
    assert_eq!(single.resolution_tier, Some(ResolutionTier::SingleNoMidpoint));
    assert_eq!(single.no.midpoint, Some(dec!(0.35)));

    let totals = report.totals.as_ref().unwrap();
    assert_eq!(totals.markets, 2);
    assert_eq!(totals.total_stake, dec!(200));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["markets"][0]["majority_side"], "NO");
}
