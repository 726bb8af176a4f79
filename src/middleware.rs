//! Request ID middleware for correlating logs with requests.
//!
//! Every request gets a UUID v4, or keeps the `x-request-id` it arrived with
//! when that header holds a valid UUID. A tracing span carrying the id wraps
//! the whole request, so the pipeline's stage logs can be tied back to one
//! call. The id is echoed in the response's `x-request-id` header.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use axum::http::header::{HeaderName, HeaderValue};
use tracing::Instrument;
use uuid::Uuid;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn incoming_request_id(request: &Request) -> Option<Uuid> {
    let value = request.headers().get(&X_REQUEST_ID)?.to_str().ok()?;
    Uuid::parse_str(value).ok()
}

/// Middleware that assigns a request ID and creates the request span.
///
/// Install as the outermost layer so the span covers all other layers.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(Uuid::new_v4);

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(X_REQUEST_ID.clone(), value);
        }
        response
    }
    .instrument(span)
    .await
}
