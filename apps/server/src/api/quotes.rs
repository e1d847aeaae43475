use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use screener_market_data::{parse_vendor_date, HistoricalQuote, Quote};

#[derive(serde::Deserialize)]
struct QuotesQuery {
    symbols: Option<String>,
}

/// Symbols from a comma-separated list; `None` when the list is empty.
fn parse_symbols(raw: &str) -> Option<Vec<String>> {
    let symbols: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!symbols.is_empty()).then_some(symbols)
}

/// Latest quotes for `symbols`, or for the popular list when omitted.
///
/// Symbols that fail are left out of the response.
async fn list_quotes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<QuotesQuery>,
) -> ApiResult<Json<Vec<Quote>>> {
    let symbols = match q.symbols {
        Some(raw) => parse_symbols(&raw)
            .ok_or_else(|| ApiError::BadRequest("symbols must not be empty".to_string()))?,
        None => state.popular_symbols.clone(),
    };

    let batch = state.quote_service()?.fetch_quotes(&symbols).await;
    if !batch.is_complete() {
        tracing::debug!(
            "Returning {} of {} quotes",
            batch.quotes.len(),
            symbols.len()
        );
    }
    Ok(Json(batch.quotes))
}

async fn get_quote(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Quote>> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ApiError::BadRequest("symbol must not be empty".to_string()));
    }
    let quote = state.quote_service()?.fetch_quote(symbol).await?;
    Ok(Json(quote))
}

#[derive(serde::Deserialize)]
struct QuoteHistoryQuery {
    symbol: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

fn required<'a>(name: &str, value: &'a Option<String>) -> ApiResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", name)))
}

fn parse_date(name: &str, value: &str) -> ApiResult<NaiveDate> {
    parse_vendor_date(value).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid {} date '{}', expected YYYY-MM-DD", name, value))
    })
}

async fn get_quote_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<QuoteHistoryQuery>,
) -> ApiResult<Json<Vec<HistoricalQuote>>> {
    let symbol = required("symbol", &q.symbol)?;
    let from = parse_date("from", required("from", &q.from)?)?;
    let to = parse_date("to", required("to", &q.to)?)?;
    if from > to {
        return Err(ApiError::BadRequest(format!(
            "from ({}) must not be after to ({})",
            from, to
        )));
    }

    let rows = state
        .quote_service()?
        .fetch_historical_quotes(symbol, from, to)
        .await?;
    Ok(Json(rows))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes", get(list_quotes))
        .route("/quotes/history", get(get_quote_history))
        .route("/quotes/{symbol}", get(get_quote))
}
