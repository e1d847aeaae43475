//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all upstream adapters implement
//! - The per-instance rate limiter used by throttled adapters
//! - Provider selection from settings
//! - Concrete adapters (Alpha Vantage, Yahoo Finance)
//!
//! # Architecture
//!
//! The provider system is designed to be:
//! - **Provider-agnostic**: callers depend on `QuoteProvider`, never on a vendor
//! - **Extensible**: a new vendor is one new implementer plus one `ProviderKind` variant
//! - **Normalizing**: every adapter produces the same `Quote`/`HistoricalQuote` shapes

mod rate_limiter;
mod settings;
mod traits;

pub mod alpha_vantage;
pub mod yahoo;

// Re-exports
pub use rate_limiter::{RateLimit, RateLimiter, DEFAULT_MIN_INTERVAL};
pub use settings::{build_provider, ProviderKind, ProviderSettings, DEFAULT_REQUEST_TIMEOUT};
pub use traits::QuoteProvider;
