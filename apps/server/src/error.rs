use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use screener_market_data::MarketDataError;
use serde::Serialize;
use thiserror::Error;

/// Message returned for upstream failures; details stay in the logs.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch stock data";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    MarketData(#[from] MarketDataError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::MarketData(e) => match e {
                MarketDataError::Configuration(_) => {
                    tracing::error!("Quote service unavailable: {}", e);
                    (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
                }
                MarketDataError::NoData { .. } => (StatusCode::NOT_FOUND, e.to_string()),
                MarketDataError::Upstream { .. } | MarketDataError::RateLimited { .. } => {
                    tracing::error!("Error fetching stocks: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        FETCH_FAILED_MESSAGE.to_string(),
                    )
                }
            },
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
