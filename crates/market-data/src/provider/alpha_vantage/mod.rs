//! Alpha Vantage quote provider implementation.
//!
//! Both latest quotes and historical ranges come from the TIME_SERIES_DAILY
//! endpoint. The latest quote is the newest day of the series; its previous
//! close is the close of the day before.
//!
//! Note: Alpha Vantage throttles aggressively, so every request goes through
//! the provider's own [`RateLimiter`] and batches run sequentially.

mod models;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{normalize_series, parse_vendor_date, HistoricalQuote, PriceSnapshot, Quote};
use crate::provider::settings::DEFAULT_REQUEST_TIMEOUT;
use crate::provider::{QuoteProvider, RateLimit, RateLimiter, DEFAULT_MIN_INTERVAL};

use models::{DailyBar, TimeSeriesResponse};

const BASE_URL: &str = "https://www.alphavantage.co";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// `outputsize=compact` returns roughly the last 100 trading days.
const COMPACT_WINDOW_DAYS: i64 = 140;

/// Alpha Vantage quote provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Self::build_client(DEFAULT_REQUEST_TIMEOUT),
            api_key,
            base_url: BASE_URL.to_string(),
            rate_limiter: RateLimiter::new(DEFAULT_MIN_INTERVAL),
        }
    }

    /// Apply a per-request timeout to upstream calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::build_client(timeout);
        self
    }

    /// Change the minimum spacing between requests.
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.rate_limiter = RateLimiter::new(min_interval);
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
            .build()
            .unwrap_or_else(|_| Client::new())
    }

    /// Make a rate-limited request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", self.api_key.as_str()));

        let url = reqwest::Url::parse_with_params(&format!("{}/query", self.base_url), &all_params)
            .map_err(|e| {
                MarketDataError::upstream(PROVIDER_ID, format!("Failed to build URL: {}", e))
            })?;

        self.rate_limiter.acquire().await;
        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::rate_limited(PROVIDER_ID));
        }
        if !status.is_success() {
            return Err(MarketDataError::upstream(
                PROVIDER_ID,
                format!("HTTP {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))
    }

    fn is_throttle_notice(message: &str) -> bool {
        let lower = message.to_ascii_lowercase();
        lower.contains("call frequency") || lower.contains("rate limit")
    }

    /// Parse the payload and turn embedded markers into errors.
    ///
    /// - `Note`/`Information` about call frequency: `RateLimited`
    /// - `Error Message` naming the apikey: `Configuration`
    /// - any other `Error Message`: `NoData` (the vendor does not know the symbol)
    /// - no series and no marker: `Upstream`
    fn parse_response(
        text: &str,
        symbol: &str,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError> {
        let response: TimeSeriesResponse = serde_json::from_str(text).map_err(|e| {
            MarketDataError::upstream(PROVIDER_ID, format!("Failed to parse response: {}", e))
        })?;

        for notice in [&response.note, &response.information].into_iter().flatten() {
            if Self::is_throttle_notice(notice) {
                return Err(MarketDataError::rate_limited(PROVIDER_ID));
            }
        }

        if let Some(msg) = response.error_message {
            debug!("Alpha Vantage error for {}: {}", symbol, msg);
            if msg.to_ascii_lowercase().contains("apikey") {
                return Err(MarketDataError::Configuration(format!(
                    "Alpha Vantage rejected the API key: {}",
                    msg
                )));
            }
            return Err(MarketDataError::no_data(symbol));
        }

        let time_series = match response.time_series {
            Some(series) => series,
            None => {
                let message = response
                    .information
                    .or(response.note)
                    .unwrap_or_else(|| "Response has no daily time series".to_string());
                return Err(MarketDataError::upstream(PROVIDER_ID, message));
            }
        };

        time_series
            .into_iter()
            .map(|(date_str, bar)| Self::parse_bar(&date_str, &bar))
            .collect()
    }

    fn parse_bar(date_str: &str, bar: &DailyBar) -> Result<HistoricalQuote, MarketDataError> {
        let date = parse_vendor_date(date_str).ok_or_else(|| {
            MarketDataError::upstream(PROVIDER_ID, format!("Invalid date: {}", date_str))
        })?;

        Ok(HistoricalQuote {
            date,
            open: Self::parse_decimal(&bar.open, "open", date_str)?,
            high: Self::parse_decimal(&bar.high, "high", date_str)?,
            low: Self::parse_decimal(&bar.low, "low", date_str)?,
            close: Self::parse_decimal(&bar.close, "close", date_str)?,
            volume: bar.volume.trim().parse::<u64>().map_err(|_| {
                MarketDataError::upstream(
                    PROVIDER_ID,
                    format!("Invalid volume '{}' on {}", bar.volume, date_str),
                )
            })?,
        })
    }

    fn parse_decimal(
        value: &str,
        field: &str,
        date_str: &str,
    ) -> Result<Decimal, MarketDataError> {
        Decimal::from_str(value.trim()).map_err(|_| {
            MarketDataError::upstream(
                PROVIDER_ID,
                format!("Invalid {} '{}' on {}", field, value, date_str),
            )
        })
    }

    /// Build a quote from the two newest days of the series.
    fn quote_from_series(
        symbol: &str,
        mut series: Vec<HistoricalQuote>,
    ) -> Result<Quote, MarketDataError> {
        // Newest first; do not rely on the map's iteration order
        series.sort_by(|a, b| b.date.cmp(&a.date));

        let (latest, previous) = match series.as_slice() {
            [latest, previous, ..] => (latest, previous),
            _ => {
                warn!(
                    "Alpha Vantage: {} has {} data point(s), need at least 2",
                    symbol,
                    series.len()
                );
                return Err(MarketDataError::no_data(symbol));
            }
        };

        let snapshot = PriceSnapshot {
            price: latest.close,
            previous_close: previous.close,
            open: latest.open,
            day_high: latest.high,
            day_low: latest.low,
            volume: latest.volume,
            market_cap: None,
            timestamp: latest.date.and_time(chrono::NaiveTime::MIN).and_utc(),
        };

        Ok(Quote::from_snapshot(symbol, snapshot, PROVIDER_ID))
    }

    /// `compact` covers recent ranges; anything older needs the full series.
    fn output_size(from: NaiveDate, today: NaiveDate) -> &'static str {
        if (today - from).num_days() <= COMPACT_WINDOW_DAYS {
            "compact"
        } else {
            "full"
        }
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> Option<RateLimit> {
        Some(RateLimit {
            min_interval: self.rate_limiter.min_interval(),
        })
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", "compact"),
        ];

        let text = self.fetch(&params).await?;
        let series = Self::parse_response(&text, symbol)?;
        Self::quote_from_series(symbol, series)
    }

    async fn fetch_historical_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError> {
        let output_size = Self::output_size(from, Local::now().date_naive());
        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", output_size),
        ];

        let text = self.fetch(&params).await?;
        let series = normalize_series(Self::parse_response(&text, symbol)?, from, to);

        if series.is_empty() {
            return Err(MarketDataError::no_data(symbol));
        }

        debug!(
            "Alpha Vantage: fetched {} daily quotes for {}",
            series.len(),
            symbol
        );
        Ok(series)
    }
}
