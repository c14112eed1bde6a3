pub mod aggregator;
pub mod config;
pub mod directions;
pub mod error;
pub mod models;
pub mod transit;
pub mod weather;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use shared::GoogleKeyResponse;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::aggregator::RouteWeatherAggregator;
use crate::error::AggregateError;
use crate::models::{RouteWeatherRequest, RouteWeatherResponse};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<RouteWeatherAggregator>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/get-google-key", get(google_key_handler))
        .route("/api/route-weather", post(route_weather_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The browser needs the directions key to render its own map tiles.
async fn google_key_handler(State(state): State<AppState>) -> Json<GoogleKeyResponse> {
    Json(GoogleKeyResponse {
        key: state.aggregator.config().google_api_key.clone(),
    })
}

async fn route_weather_handler(
    State(state): State<AppState>,
    payload: Result<Json<RouteWeatherRequest>, JsonRejection>,
) -> Result<Json<RouteWeatherResponse>, AggregateError> {
    let Json(req) = payload.map_err(|rejection| {
        AggregateError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    state
        .aggregator
        .aggregate(req)
        .await
        .map(Json)
        .inspect_err(log_failure)
}

fn log_failure(err: &AggregateError) {
    match err {
        AggregateError::Transport(_) | AggregateError::Server(_) => {
            tracing::error!("route-weather request failed: {err}")
        }
        AggregateError::Config(_) => tracing::error!("provider credentials are not configured"),
        AggregateError::Upstream(_) => tracing::warn!("route-weather request rejected upstream: {err}"),
        AggregateError::Validation(_) => tracing::debug!("invalid route-weather request: {err}"),
    }
}
