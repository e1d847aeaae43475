//! Screener Market Data Crate
//!
//! This crate fetches current and historical equity quotes from one of
//! several interchangeable upstream providers and normalizes them into a
//! single shape for the presentation layer.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Multiple providers: Alpha Vantage, Yahoo Finance
//! - Per-provider rate limiting (minimum request spacing)
//! - Batch fetching with per-symbol failure reporting
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  QuoteService    |  (facade, one configured provider)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  QuoteProvider   | --> |   RateLimiter    |  (per adapter instance)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |  Vendor payload  |  (typed serde models)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! | Quote / History  | --> |   BatchQuotes    |  (quotes + failures)
//! +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Point-in-time quote with derived change fields
//! - [`HistoricalQuote`] - One trading day of OHLCV data
//! - [`QuoteProvider`] - Contract every upstream adapter implements
//! - [`QuoteService`] - Stable entry point bound to one provider
//! - [`BatchQuotes`] - Partial-success result of a batch fetch

pub mod batch;
pub mod errors;
pub mod models;
pub mod provider;
pub mod service;

pub use batch::{fetch_batch, BatchQuotes, SymbolFailure};
pub use errors::MarketDataError;
pub use models::{parse_vendor_date, HistoricalQuote, PriceSnapshot, Quote};

// Re-export provider types
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{
    build_provider, ProviderKind, ProviderSettings, QuoteProvider, RateLimit, RateLimiter,
};

pub use service::{QuoteService, QuoteServiceTrait};
