mod common;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use screener_market_data::{
    MarketDataError, ProviderKind, ProviderSettings, QuoteProvider, QuoteService,
    QuoteServiceTrait, YahooProvider,
};

use common::{ok, status, FakeUpstream};

fn provider(upstream: &FakeUpstream) -> YahooProvider {
    YahooProvider::new()
        .with_base_url(&upstream.base_url)
        .with_timeout(Duration::from_secs(2))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn quote_body(price: f64, previous_close: f64) -> String {
    serde_json::json!({
        "chart": {
            "result": [{
                "meta": {
                    "regularMarketPrice": price,
                    "previousClose": previous_close,
                    "regularMarketOpen": previous_close,
                    "regularMarketDayHigh": price,
                    "regularMarketDayLow": previous_close,
                    "regularMarketVolume": 1200,
                    "regularMarketTime": 1709672400,
                    "gmtoffset": -18000
                },
                "timestamp": [],
                "indicators": {"quote": [{}]}
            }],
            "error": null
        }
    })
    .to_string()
}

#[tokio::test]
async fn quote_end_to_end() {
    let upstream = FakeUpstream::start(vec![("MSFT", ok(quote_body(410.0, 400.0)))]).await;

    let quote = provider(&upstream).fetch_quote("MSFT").await.unwrap();
    assert_eq!(quote.symbol, "MSFT");
    assert_eq!(quote.price, dec!(410));
    assert_eq!(quote.change, dec!(10));
    assert_eq!(quote.change_percent, Some(dec!(2.5)));
    assert_eq!(quote.volume, 1200);
    assert_eq!(quote.market_cap, None);

    let requests = upstream.requests();
    assert_eq!(requests[0].path, "/v8/finance/chart/MSFT");
    assert_eq!(requests[0].query["range"], "1d");
    assert_eq!(requests[0].query["interval"], "1d");
}

#[tokio::test]
async fn not_found_and_throttle_statuses() {
    let upstream = FakeUpstream::start(vec![
        ("GONE", status(StatusCode::NOT_FOUND)),
        ("BUSY", status(StatusCode::TOO_MANY_REQUESTS)),
        ("BROKEN", status(StatusCode::BAD_GATEWAY)),
    ])
    .await;
    let provider = provider(&upstream);

    assert!(matches!(
        provider.fetch_quote("GONE").await.unwrap_err(),
        MarketDataError::NoData { .. }
    ));
    assert!(matches!(
        provider.fetch_quote("BUSY").await.unwrap_err(),
        MarketDataError::RateLimited { .. }
    ));
    assert!(matches!(
        provider.fetch_quote("BROKEN").await.unwrap_err(),
        MarketDataError::Upstream { .. }
    ));
}

#[tokio::test]
async fn concurrent_batch_with_partial_failure() {
    let upstream = FakeUpstream::start(vec![
        ("AAA", ok(quote_body(11.0, 10.0))),
        ("CCC", ok(quote_body(31.0, 30.0))),
        ("BBB", status(StatusCode::INTERNAL_SERVER_ERROR)),
    ])
    .await;

    let symbols: Vec<String> = ["AAA", "BBB", "CCC"].iter().map(|s| s.to_string()).collect();
    let batch = provider(&upstream).fetch_quotes(&symbols).await;

    let mut fetched: Vec<_> = batch.quotes.iter().map(|q| q.symbol.as_str()).collect();
    fetched.sort();
    assert_eq!(fetched, vec!["AAA", "CCC"]);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].symbol, "BBB");
    for quote in &batch.quotes {
        assert_eq!(quote.change, quote.price - quote.previous_close);
    }
}

#[tokio::test]
async fn history_through_service() {
    // 2023-12-29, 2024-01-02, 2024-01-03, 2024-02-01 at 14:30 UTC, one row repeated
    let body = serde_json::json!({
        "chart": {
            "result": [{
                "meta": {"gmtoffset": -18000},
                "timestamp": [1703860200, 1704205800, 1704292200, 1704292200, 1706797800],
                "indicators": {"quote": [{
                    "open": [1.0, 2.0, 3.0, 3.5, 5.0],
                    "high": [1.0, 2.0, 3.0, 3.5, 5.0],
                    "low": [1.0, 2.0, 3.0, 3.5, 5.0],
                    "close": [1.0, 2.0, 3.0, 3.5, 5.0],
                    "volume": [10, 20, 30, 35, 50]
                }]}
            }],
            "error": null
        }
    })
    .to_string();
    let upstream = FakeUpstream::start(vec![("AAPL", ok(body))]).await;
    let service = QuoteService::new(std::sync::Arc::new(provider(&upstream)));

    let rows = service
        .fetch_historical_quotes("AAPL", date(2024, 1, 1), date(2024, 1, 31))
        .await
        .unwrap();

    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 2), date(2024, 1, 3)]);
    // last occurrence of a duplicate date wins
    assert_eq!(rows[1].close, dec!(3.5));

    let query = &upstream.requests()[0].query;
    let period1: i64 = query["period1"].parse().unwrap();
    let period2: i64 = query["period2"].parse().unwrap();
    assert!(period1 <= 1704067200);
    assert!(period2 > 1706659200);
}

#[tokio::test]
async fn service_from_settings_selects_yahoo() {
    let settings = ProviderSettings {
        kind: ProviderKind::Yahoo,
        ..Default::default()
    };
    let service = QuoteService::from_settings(&settings).unwrap();
    assert_eq!(service.provider_id(), "YAHOO");
}
