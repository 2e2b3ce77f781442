use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header::USER_AGENT, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::sanitize::validators::is_valid_uuid;
use crate::sanitize::Sanitizer;

/// HTTP header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id stored in request extensions for handlers
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request logging middleware.
///
/// Reuses an incoming `x-request-id` only when it is a well-formed UUID,
/// otherwise generates one. Every value that comes from the client is
/// passed through the sanitizer before it is attached to the span or an
/// event.
pub async fn log_requests(
    State(sanitizer): State<Arc<Sanitizer>>,
    mut request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_valid_uuid(id))
        .map(|id| id.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().to_string();
    let path = sanitizer.sanitize("path", request.uri().path());
    let user_agent = match request.headers().get(USER_AGENT) {
        Some(value) => sanitizer.sanitize("user_agent", value.to_str().ok()),
        None => sanitizer.sanitize("user_agent", ""),
    };
    let logged_id = sanitizer.sanitize("request_id", request_id.as_str());

    let span = info_span!(
        "http_request",
        request_id = logged_id.as_str(),
        method = method.as_str(),
        path = path.as_str(),
    );

    request.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = async move {
        tracing::debug!(user_agent = user_agent.as_str(), "request started");
        next.run(request).await
    }
    .instrument(span.clone())
    .await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;
    span.in_scope(|| {
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), latency_ms, "request completed");
        } else {
            tracing::info!(status = status.as_u16(), latency_ms, "request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
