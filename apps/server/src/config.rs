use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use screener_market_data::{ProviderKind, ProviderSettings};

const DEFAULT_POPULAR_SYMBOLS: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NVDA", "JPM", "V", "WMT",
];

pub struct Config {
    pub listen_addr: SocketAddr,
    pub provider: ProviderKind,
    pub alpha_vantage_api_key: Option<String>,
    pub upstream_timeout: Duration,
    pub min_request_interval: Duration,
    pub request_timeout: Duration,
    pub cors_allow: Vec<String>,
    pub popular_symbols: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source. Unset and blank values
    /// take the defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = var("SCREENER_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SCREENER_LISTEN_ADDR")?;
        let provider: ProviderKind = match var("SCREENER_PROVIDER") {
            Some(raw) => raw.parse().context("Invalid SCREENER_PROVIDER")?,
            None => ProviderKind::default(),
        };
        let millis = |name: &str, default: u64| -> anyhow::Result<Duration> {
            let ms = match var(name) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid {}: '{}'", name, raw))?,
                None => default,
            };
            Ok(Duration::from_millis(ms))
        };
        let list = |raw: String| -> Vec<String> {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };

        Ok(Self {
            listen_addr,
            provider,
            alpha_vantage_api_key: var("ALPHA_VANTAGE_API_KEY").map(|k| k.trim().to_string()),
            upstream_timeout: millis("SCREENER_UPSTREAM_TIMEOUT_MS", 5000)?,
            min_request_interval: millis("SCREENER_MIN_REQUEST_INTERVAL_MS", 200)?,
            request_timeout: millis("SCREENER_REQUEST_TIMEOUT_MS", 30000)?,
            cors_allow: list(var("SCREENER_CORS_ALLOW_ORIGINS").unwrap_or_else(|| "*".into())),
            popular_symbols: var("SCREENER_POPULAR_SYMBOLS")
                .map(list)
                .unwrap_or_else(|| DEFAULT_POPULAR_SYMBOLS.iter().map(|s| s.to_string()).collect()),
        })
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            kind: self.provider,
            alpha_vantage_api_key: self.alpha_vantage_api_key.clone(),
            request_timeout: self.upstream_timeout,
            min_request_interval: self.min_request_interval,
        }
    }
}
