//! HTTP route handlers.
//!
//! `/` and `/health` are liveness probes; `/predict` runs the inference
//! pipeline. Prediction responses are marked `no-store` so intermediaries
//! never serve one house's price for another request.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod predict;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_PREDICT;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let liveness_routes = Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health));

    let predict_routes = Router::new()
        .route("/predict", post(predict::predict))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_PREDICT),
        ));

    Router::new()
        .merge(liveness_routes)
        .merge(predict_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
