//! Quote provider trait definitions.
//!
//! This module defines the `QuoteProvider` trait that every upstream
//! adapter implements.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::batch::{self, BatchQuotes};
use crate::errors::MarketDataError;
use crate::models::{HistoricalQuote, Quote};

use super::rate_limiter::RateLimit;

/// Trait for quote providers.
///
/// Implement this trait to add support for a new upstream source. Callers
/// only ever see this contract, so a new implementer never requires changes
/// to the service layer.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use screener_market_data::provider::QuoteProvider;
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     // ... implement fetch_quote and fetch_historical_quotes
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO", "ALPHA_VANTAGE", etc.
    fn id(&self) -> &'static str;

    /// Spacing enforced between outbound requests, if the vendor publishes a
    /// rate ceiling.
    ///
    /// The batch fetcher runs requests sequentially when this is `Some`, and
    /// concurrently otherwise.
    fn rate_limit(&self) -> Option<RateLimit> {
        None
    }

    /// Fetch the latest quote for a symbol.
    ///
    /// # Errors
    ///
    /// - `Upstream` when the HTTP call fails or the payload lacks required fields
    /// - `RateLimited` when the vendor signals throttling
    /// - `NoData` when the vendor has no series for the symbol
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch quotes for several symbols, collecting per-symbol failures
    /// instead of failing the whole batch.
    async fn fetch_quotes(&self, symbols: &[String]) -> BatchQuotes {
        batch::fetch_batch(self, symbols).await
    }

    /// Fetch daily OHLCV records for `symbol` between `from` and `to` (inclusive).
    ///
    /// The result is ascending by date with no duplicate dates, even if the
    /// vendor returns unsorted or superset data.
    async fn fetch_historical_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError>;
}
