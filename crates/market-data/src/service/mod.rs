//! Quote service.
//!
//! The stable entry point for callers: it binds exactly one configured
//! [`QuoteProvider`] and forwards requests to it. Swapping vendors is a
//! settings change and never touches code that depends on this module.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use crate::batch::BatchQuotes;
use crate::errors::MarketDataError;
use crate::models::{HistoricalQuote, Quote};
use crate::provider::{build_provider, ProviderSettings, QuoteProvider};

/// Trait for quote operations exposed to the presentation layer.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Identifier of the bound provider.
    fn provider_id(&self) -> &'static str;

    /// Get the latest quote for a symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Get the latest quotes for several symbols, with per-symbol failures.
    async fn fetch_quotes(&self, symbols: &[String]) -> BatchQuotes;

    /// Get daily records for `symbol` in `[from, to]`.
    async fn fetch_historical_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError>;
}

/// Façade over a single configured provider.
pub struct QuoteService {
    provider: Arc<dyn QuoteProvider>,
}

impl QuoteService {
    /// Bind an already constructed provider.
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Select and construct the provider described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when the selected vendor lacks a credential.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, MarketDataError> {
        Ok(Self::new(build_provider(settings)?))
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching quote for {} from {}", symbol, self.provider.id());
        self.provider.fetch_quote(symbol).await
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> BatchQuotes {
        self.provider.fetch_quotes(symbols).await
    }

    async fn fetch_historical_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError> {
        debug!(
            "Fetching history for {} ({} to {}) from {}",
            symbol,
            from,
            to,
            self.provider.id()
        );
        self.provider.fetch_historical_quotes(symbol, from, to).await
    }
}
