//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile the route tree into an ordered list of full patterns
//! - Resolve a URL to the route that renders it
//! - Build URLs from route names for programmatic navigation
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - Children are tried before their parent, siblings in table order
//! - Resolution never fails: the catch-all route always matches
//! - Paths outside the configured base go straight to the catch-all

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::matcher::{join_paths, split_path, BuildError, Params, PathPattern};
use super::route::{RouteDef, View};
use super::table::{self, RouteTableError};
use crate::error::LookupError;

/// A route flattened to its full path.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub name: &'static str,
    pub view: View,
    pub props: bool,
    pattern: PathPattern,
    /// Route names from the top-level ancestor down to this route.
    chain: Vec<&'static str>,
}

impl CompiledRoute {
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Summary of a compiled route for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub name: &'static str,
    pub path: String,
    pub view: View,
    pub props: bool,
    pub params: Vec<String>,
}

/// The outcome of resolving a URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMatch {
    pub name: &'static str,
    pub view: View,
    /// Request path with query, fragment and base removed.
    pub path: String,
    /// Matched route names, outermost first.
    pub matched: Vec<&'static str>,
    pub params: Params,
    /// Params forwarded to the view; empty unless the route enables props.
    pub props: Params,
}

impl RouteMatch {
    /// True if only the catch-all matched.
    pub fn is_not_found(&self) -> bool {
        self.view == View::NotFound
    }
}

/// Errors raised by programmatic navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("route '{route}': {source}")]
    Build {
        route: String,
        #[source]
        source: BuildError,
    },
}

/// Page router over a validated route table.
#[derive(Debug, Clone)]
pub struct PageRouter {
    routes: Vec<CompiledRoute>,
    base: String,
    fallback: usize,
}

impl PageRouter {
    /// Compile a route table mounted at `/`.
    pub fn new(routes: &[RouteDef]) -> Result<Self, Vec<RouteTableError>> {
        Self::with_base(routes, "/")
    }

    /// Compile a route table mounted under `base` (e.g. `/app`).
    pub fn with_base(routes: &[RouteDef], base: &str) -> Result<Self, Vec<RouteTableError>> {
        table::validate(routes)?;

        let mut compiled = Vec::new();
        let mut errors = Vec::new();
        for route in routes {
            flatten(route, "", &[], &mut compiled, &mut errors);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let fallback = compiled
            .iter()
            .position(|r| r.pattern.is_catch_all())
            .ok_or_else(|| vec![RouteTableError::MissingCatchAll])?;

        let base = normalize_base(base);

        tracing::info!(
            routes = compiled.len(),
            base = %base,
            fallback = compiled[fallback].name,
            "Page router compiled"
        );

        Ok(Self {
            routes: compiled,
            base,
            fallback,
        })
    }

    /// Router over the application's own table.
    pub fn app(base: &str) -> Result<Self, Vec<RouteTableError>> {
        Self::with_base(table::app_routes(), base)
    }

    /// Mount point, without trailing slash (`""` for the root).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Compiled routes in match order.
    pub fn routes(&self) -> Vec<RouteSummary> {
        self.routes
            .iter()
            .map(|r| RouteSummary {
                name: r.name,
                path: r.path().to_string(),
                view: r.view,
                props: r.props,
                params: r.pattern.param_names().into_iter().map(String::from).collect(),
            })
            .collect()
    }

    /// Resolve a URL (path with optional query and fragment).
    pub fn resolve(&self, url: &str) -> RouteMatch {
        let path = strip_query_and_fragment(url);

        let (index, segments, local) = match self.strip_base(path) {
            Some(local) => {
                let segments = split_path(local);
                let index = self
                    .routes
                    .iter()
                    .position(|r| r.pattern.matches(&segments).is_some())
                    .unwrap_or(self.fallback);
                (index, segments, local)
            }
            None => (self.fallback, split_path(path), path),
        };

        let route = &self.routes[index];
        let params = route.pattern.matches(&segments).unwrap_or_default();
        let props = if route.props { params.clone() } else { Params::new() };

        tracing::debug!(path = %path, route = route.name, "Resolved page route");

        RouteMatch {
            name: route.name,
            view: route.view,
            path: if local.is_empty() { "/".to_string() } else { local.to_string() },
            matched: route.chain.clone(),
            params,
            props,
        }
    }

    /// Build the URL of a named route, including the base.
    pub fn href(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<String, NavigationError> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| LookupError::UnknownRoute(name.to_string()))?;

        let path = route
            .pattern
            .build(params)
            .map_err(|source| NavigationError::Build {
                route: route.name.to_string(),
                source,
            })?;

        Ok(if self.base.is_empty() {
            path
        } else if path == "/" {
            self.base.clone()
        } else {
            format!("{}{}", self.base, path)
        })
    }

    fn strip_base<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.base.is_empty() {
            return Some(path);
        }
        let head = path.get(..self.base.len())?;
        let rest = path.get(self.base.len()..)?;
        let matches = head.eq_ignore_ascii_case(&self.base);
        (matches && (rest.is_empty() || rest.starts_with('/'))).then_some(rest)
    }
}

fn flatten(
    route: &RouteDef,
    parent: &str,
    ancestors: &[&'static str],
    out: &mut Vec<CompiledRoute>,
    errors: &mut Vec<RouteTableError>,
) {
    let full = if parent.is_empty() {
        route.path.to_string()
    } else {
        join_paths(parent, route.path)
    };

    let mut chain = ancestors.to_vec();
    chain.push(route.name);

    for child in route.children {
        flatten(child, &full, &chain, out, errors);
    }

    match PathPattern::parse(&full) {
        Ok(pattern) => out.push(CompiledRoute {
            name: route.name,
            view: route.view,
            props: route.props,
            pattern,
            chain,
        }),
        Err(source) => errors.push(RouteTableError::Pattern {
            name: route.name.to_string(),
            source,
        }),
    }
}

fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
