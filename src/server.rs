//! HTTP surface for the search service.
//!
//! One meaningful route: `GET /search`. Query parameters are validated
//! here and rejected with a 400 before the aggregator — and therefore any
//! connector — is ever invoked. Source-level failures never surface as
//! HTTP errors; they are visible only through the `activeSources` field of
//! the response body.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use agora_search::{SearchAggregator, SearchError, SearchRequest, UserType};

use crate::config::ServerConfig;

#[derive(Clone)]
struct AppState {
    aggregator: Arc<SearchAggregator>,
}

/// Build the service router over a configured aggregator.
pub fn router(aggregator: Arc<SearchAggregator>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .with_state(AppState { aggregator })
}

/// Bind the configured listener and serve until shutdown.
pub async fn run(config: &ServerConfig, aggregator: Arc<SearchAggregator>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("agora search service listening on http://{local_addr}");
    axum::serve(listener, router(aggregator)).await?;
    Ok(())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let sources: Vec<serde_json::Value> = state
        .aggregator
        .health_report()
        .into_iter()
        .map(|(source, circuit, failures)| {
            serde_json::json!({
                "source": source,
                "state": circuit.name(),
                "consecutiveFailures": failures,
            })
        })
        .collect();

    Json(serde_json::json!({
        "status": "ok",
        "sources": sources,
    }))
}

/// Raw `GET /search` query parameters, validated by [`build_request`].
#[derive(Debug, Deserialize)]
struct SearchQueryParams {
    q: Option<String>,
    user_type: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    region: Option<String>,
    currency: Option<String>,
    /// Comma-separated `key:value` pairs.
    filters: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> axum::response::Response {
    let request_id = Uuid::new_v4();

    let req = match build_request(params) {
        Ok(req) => req,
        Err(message) => {
            tracing::debug!(%request_id, %message, "search request rejected");
            return bad_request(&message);
        }
    };

    tracing::debug!(%request_id, query = %req.query, user_type = %req.user_type, "search request");

    match state.aggregator.search(req).await {
        Ok(response) => Json(response).into_response(),
        Err(SearchError::Validation(message)) => bad_request(&message),
        Err(err) => {
            tracing::error!(%request_id, error = %err, "search request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

fn bad_request(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Validate raw query parameters into a [`SearchRequest`].
///
/// All of the inbound contract's client errors originate here: missing or
/// empty `q`, `limit < 1`, negative `offset`, unknown `user_type`, and
/// malformed `filters` entries.
fn build_request(params: SearchQueryParams) -> Result<SearchRequest, String> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or("query parameter q must not be empty")?
        .to_owned();

    let user_type = match params.user_type.as_deref() {
        Some(raw) => raw
            .parse::<UserType>()
            .map_err(|e| e.to_string())?,
        None => UserType::default(),
    };

    let limit = match params.limit {
        Some(limit) if limit < 1 => return Err("limit must be at least 1".to_owned()),
        Some(limit) => limit as usize,
        None => SearchRequest::default().limit,
    };

    let offset = match params.offset {
        Some(offset) if offset < 0 => return Err("offset must not be negative".to_owned()),
        Some(offset) => offset as usize,
        None => 0,
    };

    let filters = parse_filters(params.filters.as_deref())?;

    let defaults = SearchRequest::default();
    Ok(SearchRequest {
        query,
        user_type,
        limit,
        offset,
        filters,
        sort_by: None,
        region: params.region.unwrap_or(defaults.region),
        currency: params.currency.unwrap_or(defaults.currency),
    })
}

/// Parse `key:value,key:value` filter syntax. Empty segments are skipped;
/// a segment without a `:` separator is a client error.
fn parse_filters(raw: Option<&str>) -> Result<BTreeMap<String, String>, String> {
    let mut filters = BTreeMap::new();
    let Some(raw) = raw else {
        return Ok(filters);
    };

    for segment in raw.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (key, value) = segment
            .split_once(':')
            .ok_or_else(|| format!("invalid filters entry: {segment}"))?;
        filters.insert(key.trim().to_owned(), value.trim().to_owned());
    }

    Ok(filters)
}
