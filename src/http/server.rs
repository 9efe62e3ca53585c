//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with API handlers and the shell fallback
//! - Wire up middleware (tracing, latency, limits, request ID, security headers)
//! - Bind server to listener and shut down on signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware,
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::categories::CategoryRegistry;
use crate::config::AppConfig;
use crate::http::request::{
    propagate_request_id_layer, record_latency, request_id, set_request_id_layer,
};
use crate::http::{api, shell};
use crate::lifecycle::ShutdownSignal;
use crate::routing::{PageRouter, RouteTableError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<PageRouter>,
    pub categories: &'static CategoryRegistry,
    pub app_title: Arc<str>,
}

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid route table: {}", join_errors(.0))]
    RouteTable(Vec<RouteTableError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_errors(errors: &[RouteTableError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// HTTP server for the spend-tracker shell.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let page_router =
            PageRouter::app(&config.routing.base).map_err(ServerError::RouteTable)?;

        let state = AppState {
            router: Arc::new(page_router),
            categories: CategoryRegistry::global(),
            app_title: Arc::from(config.routing.app_title.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(api::health))
            .route("/api/categories", get(api::list_categories))
            .route("/api/categories/by-label/{label}", get(api::category_by_label))
            .route("/api/categories/{id}", get(api::get_category))
            .route("/api/routes", get(api::list_routes))
            .route("/api/resolve", get(api::resolve))
            .route("/api/href/{name}", get(api::href))
            .fallback(shell::page)
            .with_state(state)
            .layer(middleware::from_fn(record_latency))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                ));
        }

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base = %self.config.routing.base,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn app(config: AppConfig) -> Router {
        HttpServer::new(config).unwrap().router
    }

    async fn get(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_shell_status_follows_route() {
        let router = app(AppConfig::default());
        assert_eq!(get(router.clone(), "/").await.status(), StatusCode::OK);
        assert_eq!(get(router.clone(), "/spend/9").await.status(), StatusCode::OK);
        assert_eq!(get(router, "/nope/nope").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_security_headers_can_be_disabled() {
        let mut config = AppConfig::default();
        config.security.enable_headers = false;
        let res = get(app(config), "/login").await;
        assert!(res.headers().get(header::X_CONTENT_TYPE_OPTIONS).is_none());
        assert!(res.headers().get("x-request-id").is_some());

        let res = get(app(AppConfig::default()), "/login").await;
        assert_eq!(res.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn test_unknown_label_is_not_found() {
        let res = get(app(AppConfig::default()), "/api/categories/by-label/Food").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_trailing_slash_base_is_accepted() {
        let mut config = AppConfig::default();
        config.routing.base = "/app/".to_string();
        let server = HttpServer::new(config).unwrap();
        assert_eq!(server.config().routing.base, "/app/");
    }
}
