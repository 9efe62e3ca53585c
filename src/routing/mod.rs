//! Page routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request URL (path, query, fragment)
//!     → router.rs (strip base, first-match lookup)
//!     → matcher.rs (evaluate path patterns, extract params)
//!     → Return: RouteMatch (catch-all guarantees one)
//!
//! Route Compilation (at startup):
//!     table.rs RouteDef tree
//!     → validate invariants (unique names, single trailing catch-all)
//!     → flatten children under parents
//!     → Freeze as immutable PageRouter
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (table order)

pub mod matcher;
pub mod route;
pub mod router;
pub mod table;

pub use matcher::{ParamValue, Params};
pub use route::{RouteDef, View};
pub use router::{NavigationError, PageRouter, RouteMatch, RouteSummary};
pub use table::{app_routes, RouteTableError};
