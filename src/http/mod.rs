//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign and propagate request ID)
//!     → api.rs (JSON: categories, routes, resolve, href)
//!     → shell.rs (fallback: resolve page route, render view shell)
//!     → Send to client
//! ```

pub mod api;
pub mod request;
pub mod server;
pub mod shell;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
