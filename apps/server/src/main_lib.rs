use std::sync::Arc;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use screener_market_data::{MarketDataError, QuoteService, QuoteServiceTrait};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    /// The configured quote service, or the reason it could not be built.
    quote_service: Result<Arc<dyn QuoteServiceTrait>, String>,
    pub popular_symbols: Vec<String>,
}

impl AppState {
    pub fn new(quote_service: Arc<dyn QuoteServiceTrait>, popular_symbols: Vec<String>) -> Self {
        Self {
            quote_service: Ok(quote_service),
            popular_symbols,
        }
    }

    /// State for a server whose provider is misconfigured. Quote routes answer
    /// with the configuration error.
    pub fn unconfigured(reason: impl Into<String>, popular_symbols: Vec<String>) -> Self {
        Self {
            quote_service: Err(reason.into()),
            popular_symbols,
        }
    }

    pub fn quote_service(&self) -> ApiResult<&Arc<dyn QuoteServiceTrait>> {
        self.quote_service
            .as_ref()
            .map_err(|reason| ApiError::from(MarketDataError::Configuration(reason.clone())))
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("SCREENER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let popular_symbols = config.popular_symbols.clone();
    let state = match QuoteService::from_settings(&config.provider_settings()) {
        Ok(service) => {
            tracing::info!(
                "Quote provider in use: {} ({} popular symbols)",
                service.provider_id(),
                popular_symbols.len()
            );
            AppState::new(Arc::new(service), popular_symbols)
        }
        Err(MarketDataError::Configuration(reason)) => {
            tracing::warn!(
                "Quote provider '{}' is not configured: {}. Quote routes will return 503.",
                config.provider,
                reason
            );
            AppState::unconfigured(reason, popular_symbols)
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to build quote service")),
    };
    Ok(Arc::new(state))
}
