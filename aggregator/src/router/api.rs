// Router HTTP API implementation
// This file exposes quote routing, the decision journal, stats and metrics
// over HTTP
//
// Numan Thabit 2025 Nov

use crate::errors::RouterError;
use crate::metrics;
use crate::router::journal::DecisionRecord;
use crate::router::routes::RouteResponse;
use crate::router::router::{Router, RouterStats};
use crate::venues::QuoteRequest;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const DEFAULT_DECISION_LIMIT: usize = 20;

/// Create the HTTP router with API endpoints
pub fn create_api_router(router: Arc<Router>) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .route("/api/v1/route", post(route_quote))
        .route("/api/v1/decisions", get(recent_decisions))
        .route("/api/v1/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(router)
}

/// Health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn prometheus_metrics() -> String {
    metrics::render()
}

fn status_for(response: &RouteResponse) -> StatusCode {
    match response {
        RouteResponse::Routed { .. } => StatusCode::OK,
        RouteResponse::Failed { code, .. } => match *code {
            crate::errors::CODE_NO_CANDIDATES => StatusCode::SERVICE_UNAVAILABLE,
            crate::errors::CODE_INVALID_REQUEST => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// Route a quote request and return the decision or a structured failure
async fn route_quote(
    State(router): State<Arc<Router>>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> (StatusCode, Json<RouteResponse>) {
    let response = match body {
        Ok(Json(req)) => RouteResponse::from(router.route_quote(&req).await),
        Err(rejection) => RouteResponse::from(RouterError::InvalidRequest(rejection.body_text())),
    };
    (status_for(&response), Json(response))
}

#[derive(Debug, Deserialize)]
pub struct DecisionsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DecisionsResponse {
    pub capacity: usize,
    pub decisions: Vec<DecisionRecord>,
}

/// Most recent routing decisions, newest first
async fn recent_decisions(
    State(router): State<Arc<Router>>,
    Query(query): Query<DecisionsQuery>,
) -> Json<DecisionsResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_DECISION_LIMIT);
    Json(DecisionsResponse {
        capacity: router.journal().capacity(),
        decisions: router.recent_decisions(limit).await,
    })
}

async fn get_stats(State(router): State<Arc<Router>>) -> Json<RouterStats> {
    Json(router.stats())
}
