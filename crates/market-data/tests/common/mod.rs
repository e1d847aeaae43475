//! A local HTTP server standing in for a market data vendor.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

/// One request seen by the fake upstream.
#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub at: Instant,
}

/// Canned response served for every request.
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone)]
struct UpstreamState {
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    responses: Arc<HashMap<String, Canned>>,
}

pub struct FakeUpstream {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeUpstream {
    /// Start a server answering by symbol.
    ///
    /// The symbol comes from the `symbol` query parameter (Alpha Vantage) or
    /// the last path segment (Yahoo). Unknown symbols get a 500.
    pub async fn start(responses: Vec<(&str, Canned)>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = UpstreamState {
            seen: seen.clone(),
            responses: Arc::new(
                responses
                    .into_iter()
                    .map(|(symbol, canned)| (symbol.to_string(), canned))
                    .collect(),
            ),
        };

        let app = Router::new()
            .route("/query", get(alpha_vantage_query))
            .route("/v8/finance/chart/{symbol}", get(yahoo_chart))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            seen,
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

fn respond(
    state: &UpstreamState,
    symbol: &str,
    path: String,
    query: HashMap<String, String>,
) -> Response {
    state.seen.lock().unwrap().push(SeenRequest {
        path,
        query,
        at: Instant::now(),
    });
    match state.responses.get(symbol) {
        Some(canned) => (canned.status, canned.body.clone()).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "unexpected symbol").into_response(),
    }
}

async fn alpha_vantage_query(
    State(state): State<UpstreamState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let symbol = query.get("symbol").cloned().unwrap_or_default();
    respond(&state, &symbol, "/query".to_string(), query)
}

async fn yahoo_chart(
    State(state): State<UpstreamState>,
    Path(symbol): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let path = format!("/v8/finance/chart/{}", symbol);
    respond(&state, &symbol, path, query)
}

pub fn ok(body: impl Into<String>) -> Canned {
    Canned {
        status: StatusCode::OK,
        body: body.into(),
    }
}

pub fn status(status: StatusCode) -> Canned {
    Canned {
        status,
        body: String::new(),
    }
}

/// Alpha Vantage TIME_SERIES_DAILY payload from `(date, close)` pairs.
pub fn alpha_vantage_series(rows: &[(&str, &str)]) -> String {
    let series: serde_json::Map<String, serde_json::Value> = rows
        .iter()
        .map(|(date, close)| {
            (
                date.to_string(),
                serde_json::json!({
                    "1. open": close,
                    "2. high": close,
                    "3. low": close,
                    "4. close": close,
                    "5. volume": "1000"
                }),
            )
        })
        .collect();
    serde_json::json!({
        "Meta Data": {"2. Symbol": "TEST"},
        "Time Series (Daily)": series
    })
    .to_string()
}
