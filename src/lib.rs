//! Spend Tracker web shell.
//!
//! Static configuration of a personal spending tracker (the category
//! taxonomy and the page route table) served as a history-mode shell.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser request
//!   ───────────────▶ http::server ──┬─▶ http::api ──▶ categories::registry
//!                                   │              └─▶ routing::router
//!                                   └─▶ http::shell ─▶ routing::router
//!
//!   Cross-cutting: config, observability (logging, metrics), lifecycle
//! ```

// Static tables
pub mod categories;
pub mod error;
pub mod routing;

// Serving
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use categories::{Category, CategoryInfo, CategoryRegistry};
pub use config::AppConfig;
pub use error::LookupError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{PageRouter, RouteMatch, View};
