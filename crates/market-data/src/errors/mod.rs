//! Error types for the market data crate.
//!
//! Every adapter maps its vendor-specific failures onto [`MarketDataError`].
//! None of the variants are retried at this layer: a failed request is
//! reported to the caller (single quote) or recorded against its symbol
//! (batch).

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Transport/HTTP failure, or a payload that is missing required fields.
    #[error("Upstream error: {provider} - {message}")]
    Upstream {
        /// The provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The vendor signaled throttling, either with an HTTP 429 or with a
    /// soft marker embedded in an otherwise successful response.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The vendor has no series for the symbol, or nothing in the requested range.
    #[error("No data for symbol: {symbol}")]
    NoData {
        /// The symbol that was requested
        symbol: String,
    },

    /// A required credential or setting is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MarketDataError {
    pub(crate) fn upstream(provider: &str, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn rate_limited(provider: &str) -> Self {
        Self::RateLimited {
            provider: provider.to_string(),
        }
    }

    pub(crate) fn no_data(symbol: &str) -> Self {
        Self::NoData {
            symbol: symbol.to_string(),
        }
    }

    /// Map a transport error from `reqwest` onto the taxonomy.
    pub(crate) fn from_transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::upstream(provider, format!("request timed out: {}", err))
        } else {
            Self::upstream(provider, err.to_string())
        }
    }

    /// True when the error comes from configuration rather than the upstream.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
