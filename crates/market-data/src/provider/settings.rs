//! Provider selection.
//!
//! Turns [`ProviderSettings`] into a concrete adapter behind
//! `Arc<dyn QuoteProvider>`. This is the only place that knows which
//! adapters exist.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::errors::MarketDataError;

use super::alpha_vantage::AlphaVantageProvider;
use super::rate_limiter::DEFAULT_MIN_INTERVAL;
use super::yahoo::YahooProvider;
use super::QuoteProvider;

/// Default per-request timeout for upstream calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Upstream vendors a deployment can be configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    AlphaVantage,
    Yahoo,
}

impl FromStr for ProviderKind {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "alpha_vantage" | "alphavantage" => Ok(Self::AlphaVantage),
            "yahoo" => Ok(Self::Yahoo),
            other => Err(MarketDataError::Configuration(format!(
                "Unknown market data provider: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphaVantage => write!(f, "alpha_vantage"),
            Self::Yahoo => write!(f, "yahoo"),
        }
    }
}

/// Everything needed to construct the configured adapter.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub alpha_vantage_api_key: Option<String>,
    /// Timeout applied to every upstream HTTP call.
    pub request_timeout: Duration,
    /// Spacing between requests for rate-limited vendors.
    pub min_request_interval: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            alpha_vantage_api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            min_request_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

/// Create the adapter selected by `settings`.
///
/// # Errors
///
/// Returns `Configuration` when the selected vendor needs a credential that
/// is missing or blank.
pub fn build_provider(
    settings: &ProviderSettings,
) -> Result<Arc<dyn QuoteProvider>, MarketDataError> {
    let provider: Arc<dyn QuoteProvider> = match settings.kind {
        ProviderKind::AlphaVantage => {
            let api_key = settings
                .alpha_vantage_api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    MarketDataError::Configuration(
                        "Alpha Vantage API key is not configured".to_string(),
                    )
                })?;
            Arc::new(
                AlphaVantageProvider::new(api_key.to_string())
                    .with_timeout(settings.request_timeout)
                    .with_min_interval(settings.min_request_interval),
            )
        }
        ProviderKind::Yahoo => {
            Arc::new(YahooProvider::new().with_timeout(settings.request_timeout))
        }
    };

    info!("Market data provider initialized: {}", provider.id());
    Ok(provider)
}
