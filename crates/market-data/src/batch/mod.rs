//! Batch quote fetching with per-symbol failure aggregation.
//!
//! A batch never fails as a whole: each symbol either yields a quote or a
//! [`SymbolFailure`]. Rate-limited providers are queried one symbol at a
//! time in input order; other providers are queried concurrently and their
//! quotes come back in completion order.

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use serde::Serialize;

use crate::models::Quote;
use crate::provider::QuoteProvider;

/// A symbol that could not be fetched, with a human-readable cause.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of a batch fetch: the quotes obtained plus the symbols that failed.
#[derive(Clone, Debug, Default)]
pub struct BatchQuotes {
    pub quotes: Vec<Quote>,
    pub failures: Vec<SymbolFailure>,
}

impl BatchQuotes {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, symbol: &str, result: Result<Quote, crate::errors::MarketDataError>) {
        match result {
            Ok(quote) => self.quotes.push(quote),
            Err(e) => self.failures.push(SymbolFailure {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Fetch a quote for every symbol in `symbols`.
///
/// Duplicates are fetched independently.
pub async fn fetch_batch<P>(provider: &P, symbols: &[String]) -> BatchQuotes
where
    P: QuoteProvider + ?Sized,
{
    let mut batch = BatchQuotes::default();
    if symbols.is_empty() {
        return batch;
    }

    if provider.rate_limit().is_some() {
        debug!(
            "Fetching {} quotes sequentially from '{}'",
            symbols.len(),
            provider.id()
        );
        for symbol in symbols {
            let result = provider.fetch_quote(symbol).await;
            batch.record(symbol, result);
        }
    } else {
        debug!(
            "Fetching {} quotes concurrently from '{}'",
            symbols.len(),
            provider.id()
        );
        let mut pending: FuturesUnordered<_> = symbols
            .iter()
            .map(|symbol| async move { (symbol, provider.fetch_quote(symbol).await) })
            .collect();
        while let Some((symbol, result)) = pending.next().await {
            batch.record(symbol, result);
        }
    }

    if !batch.failures.is_empty() {
        warn!(
            "Failed to fetch {} of {} quotes from '{}': {:?}",
            batch.failures.len(),
            symbols.len(),
            provider.id(),
            batch.failures
        );
    }

    batch
}
