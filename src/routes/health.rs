//! Liveness endpoints.
//!
//! Both routes return 200 whenever the process is serving, which only happens
//! after the artifacts loaded. Neither touches the model.

use crate::config::LIVENESS_MESSAGE;

/// Root handler with the human-readable liveness message.
pub async fn index() -> &'static str {
    tracing::info!("Root endpoint '/' called");
    LIVENESS_MESSAGE
}

/// Health check handler for container orchestration probes.
pub async fn health() -> &'static str {
    "ok"
}
