//! Per-request plumbing: IDs and latency.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Keep an incoming `x-request-id` untouched
//! - Echo the ID back on the response
//! - Record the latency of every request, API and shell alike
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request as AxumRequest},
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

use crate::observability::metrics;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Layer that assigns an ID to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<UuidRequestId> {
    SetRequestIdLayer::x_request_id(UuidRequestId)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Read the request ID header, if present.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Endpoint label for requests that no API route matched.
pub const SHELL_ENDPOINT: &str = "shell";

/// Metrics label for a request: its matched route path, or the shell.
pub fn endpoint_label(matched: Option<&MatchedPath>) -> String {
    matched
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| SHELL_ENDPOINT.to_string())
}

/// Middleware recording the latency of every request.
pub async fn record_latency(request: AxumRequest, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = endpoint_label(request.extensions().get::<MatchedPath>());

    let response = next.run(request).await;

    metrics::record_request(endpoint, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_uuid() {
        let request = Request::builder().body(()).unwrap();
        let id = UuidRequestId.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn test_request_id_fallback() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(request_id(&request), "unknown");

        let request = Request::builder()
            .header(X_REQUEST_ID, "abc")
            .body(())
            .unwrap();
        assert_eq!(request_id(&request), "abc");
    }

    #[test]
    fn test_unmatched_requests_are_labelled_shell() {
        assert_eq!(endpoint_label(None), SHELL_ENDPOINT);
    }
}
