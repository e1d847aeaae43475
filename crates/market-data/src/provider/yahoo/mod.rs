//! Yahoo Finance quote provider.
//!
//! Uses the v8 chart API for both the latest session (`range=1d`) and daily
//! history (`period1`/`period2`). Yahoo publishes no rate ceiling, so this
//! provider carries no rate limiter and batches run concurrently.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use log::debug;
use num_traits::{FromPrimitive, ToPrimitive};
use reqwest::Client;
use rust_decimal::Decimal;
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{normalize_series, HistoricalQuote, PriceSnapshot, Quote};
use crate::provider::settings::DEFAULT_REQUEST_TIMEOUT;
use crate::provider::QuoteProvider;

use models::{YahooChartResponse, YahooChartResult, YahooQuoteIndicator};

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance quote provider.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Self {
        Self {
            client: Self::build_client(DEFAULT_REQUEST_TIMEOUT),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Apply a per-request timeout to upstream calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::build_client(timeout);
        self
    }

    /// Point the provider at another host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_client(timeout: Duration) -> Client {
        Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new())
    }

    /// Fetch the chart for a symbol and unwrap the first result.
    async fn fetch_chart(
        &self,
        symbol: &str,
        query: &[(&str, String)],
    ) -> Result<YahooChartResult, MarketDataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, encode(symbol));
        debug!("Yahoo chart request: {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::rate_limited(PROVIDER_ID));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::no_data(symbol));
        }
        if !status.is_success() {
            return Err(MarketDataError::upstream(
                PROVIDER_ID,
                format!("HTTP {}", status),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;
        Self::parse_chart(&text, symbol)
    }

    /// Parse the chart envelope.
    ///
    /// A `Not Found` error or an empty result means the symbol has no data;
    /// any other error block is an upstream failure.
    fn parse_chart(text: &str, symbol: &str) -> Result<YahooChartResult, MarketDataError> {
        let response: YahooChartResponse = serde_json::from_str(text).map_err(|e| {
            MarketDataError::upstream(PROVIDER_ID, format!("Failed to parse response: {}", e))
        })?;

        if let Some(error) = response.chart.error {
            if error.code.eq_ignore_ascii_case("Not Found") {
                return Err(MarketDataError::no_data(symbol));
            }
            return Err(MarketDataError::upstream(
                PROVIDER_ID,
                format!(
                    "{}: {}",
                    error.code,
                    error.description.unwrap_or_default()
                ),
            ));
        }

        response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::no_data(symbol))
    }

    fn to_decimal(value: f64, field: &str) -> Result<Decimal, MarketDataError> {
        Decimal::from_f64(value).ok_or_else(|| {
            MarketDataError::upstream(PROVIDER_ID, format!("Invalid {}: {}", field, value))
        })
    }

    fn required(value: Option<f64>, field: &str) -> Result<Decimal, MarketDataError> {
        let value = value.ok_or_else(|| {
            MarketDataError::upstream(PROVIDER_ID, format!("Response is missing {}", field))
        })?;
        Self::to_decimal(value, field)
    }

    fn last_value(values: &[Option<f64>]) -> Option<f64> {
        values.iter().rev().find_map(|v| *v)
    }

    /// Build a quote from the session `meta`, falling back to the last daily
    /// bar for open/high/low/volume.
    fn quote_from_chart(symbol: &str, chart: YahooChartResult) -> Result<Quote, MarketDataError> {
        let meta = chart.meta;
        let bars = chart
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .unwrap_or_default();

        let price = Self::required(meta.regular_market_price, "regularMarketPrice")?;
        let previous_close = Self::required(
            meta.previous_close.or(meta.chart_previous_close),
            "previousClose",
        )?;

        let time = meta.regular_market_time.ok_or_else(|| {
            MarketDataError::upstream(PROVIDER_ID, "Response is missing regularMarketTime")
        })?;
        let timestamp = Utc.timestamp_opt(time, 0).single().ok_or_else(|| {
            MarketDataError::upstream(PROVIDER_ID, format!("Invalid timestamp: {}", time))
        })?;

        let volume = meta
            .regular_market_volume
            .or_else(|| Self::last_value(&bars.volume))
            .and_then(|v| v.to_u64())
            .ok_or_else(|| {
                MarketDataError::upstream(PROVIDER_ID, "Response is missing regularMarketVolume")
            })?;

        let snapshot = PriceSnapshot {
            price,
            previous_close,
            open: Self::required(
                meta.regular_market_open
                    .or_else(|| Self::last_value(&bars.open)),
                "regularMarketOpen",
            )?,
            day_high: Self::required(
                meta.regular_market_day_high
                    .or_else(|| Self::last_value(&bars.high)),
                "regularMarketDayHigh",
            )?,
            day_low: Self::required(
                meta.regular_market_day_low
                    .or_else(|| Self::last_value(&bars.low)),
                "regularMarketDayLow",
            )?,
            volume,
            market_cap: meta
                .market_cap
                .map(|cap| Self::to_decimal(cap, "marketCap"))
                .transpose()?,
            timestamp,
        };

        Ok(Quote::from_snapshot(symbol, snapshot, PROVIDER_ID))
    }

    /// Turn the parallel arrays into daily records.
    ///
    /// Bar timestamps are shifted by the exchange offset before taking the
    /// calendar date. Bars without a close are skipped.
    fn history_from_chart(
        chart: YahooChartResult,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError> {
        let offset = chart.meta.gmtoffset;
        let bars: YahooQuoteIndicator = chart
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .unwrap_or_default();

        let mut rows = Vec::with_capacity(chart.timestamp.len());
        for (i, ts) in chart.timestamp.iter().enumerate() {
            let close = match bars.close.get(i).copied().flatten() {
                Some(close) => Self::to_decimal(close, "close")?,
                None => {
                    debug!("Yahoo: skipping bar {} without close", ts);
                    continue;
                }
            };
            let date = ts
                .checked_add(offset)
                .and_then(|local| DateTime::from_timestamp(local, 0))
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    MarketDataError::upstream(PROVIDER_ID, format!("Invalid timestamp: {}", ts))
                })?;

            let or_close =
                |values: &[Option<f64>], field: &str| -> Result<Decimal, MarketDataError> {
                    match values.get(i).copied().flatten() {
                        Some(v) => Self::to_decimal(v, field),
                        None => Ok(close),
                    }
                };

            rows.push(HistoricalQuote {
                date,
                open: or_close(&bars.open, "open")?,
                high: or_close(&bars.high, "high")?,
                low: or_close(&bars.low, "low")?,
                close,
                volume: bars
                    .volume
                    .get(i)
                    .copied()
                    .flatten()
                    .and_then(|v| v.to_u64())
                    .unwrap_or(0),
            });
        }

        Ok(rows)
    }

    /// Epoch seconds at UTC midnight, widened by `pad_days` for exchanges far
    /// from UTC. Rows are clipped to the exact range afterwards.
    fn epoch_bound(date: NaiveDate, pad_days: i64) -> i64 {
        let padded = if pad_days >= 0 {
            date.checked_add_days(Days::new(pad_days as u64))
        } else {
            date.checked_sub_days(Days::new(pad_days.unsigned_abs()))
        };
        padded
            .unwrap_or(date)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp()
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let query = [
            ("interval", "1d".to_string()),
            ("range", "1d".to_string()),
        ];
        let chart = self.fetch_chart(symbol, &query).await?;
        Self::quote_from_chart(symbol, chart)
    }

    async fn fetch_historical_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError> {
        let query = [
            ("interval", "1d".to_string()),
            ("period1", Self::epoch_bound(from, -1).to_string()),
            ("period2", Self::epoch_bound(to, 2).to_string()),
        ];
        let chart = self.fetch_chart(symbol, &query).await?;
        let series = normalize_series(Self::history_from_chart(chart)?, from, to);

        if series.is_empty() {
            return Err(MarketDataError::no_data(symbol));
        }

        debug!("Yahoo: fetched {} daily quotes for {}", series.len(), symbol);
        Ok(series)
    }
}
