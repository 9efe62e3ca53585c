//! The application's page route table and its integrity checks.
//!
//! # Responsibilities
//! - Declare the ordered route table
//! - Validate table invariants before the router accepts it
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Catch-all must be the last top-level route so specific routes win
//! - `spend/new` is intentionally absent; see DESIGN.md

use std::collections::HashSet;

use thiserror::Error;

use super::matcher::{join_paths, PathPattern, PatternError};
use super::route::{RouteDef, View};

static MAIN_CHILDREN: [RouteDef; 1] =
    [RouteDef::new("spend/:id", "EditSpend", View::EditSpend).with_props()];

/// Ordered route table. First match wins.
pub static APP_ROUTES: [RouteDef; 5] = [
    RouteDef::new("/", "Main", View::Main).with_children(&MAIN_CHILDREN),
    RouteDef::new("/spend-analysis", "SpendAnalysis", View::SpendAnalysis),
    RouteDef::new("/login", "Login", View::Login),
    RouteDef::new("/register", "Register", View::Register),
    RouteDef::new("/:pathMatch(.*)*", "NotFound", View::NotFound),
];

/// The application's route table.
pub fn app_routes() -> &'static [RouteDef] {
    &APP_ROUTES
}

/// A violated route table invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("duplicate route name: {0}")]
    DuplicateName(String),

    #[error("route table has no catch-all route")]
    MissingCatchAll,

    #[error("route table has more than one catch-all route: {0:?}")]
    MultipleCatchAll(Vec<String>),

    #[error("catch-all route '{0}' must be the last top-level route")]
    CatchAllNotLast(String),

    #[error("route '{name}': top-level path must start with '/': {path}")]
    RelativeTopLevel { name: String, path: String },

    #[error("route '{name}': child path must be relative: {path}")]
    AbsoluteChild { name: String, path: String },

    #[error("route '{name}': {source}")]
    Pattern {
        name: String,
        #[source]
        source: PatternError,
    },
}

/// Check every invariant of a route table.
pub fn validate(routes: &[RouteDef]) -> Result<(), Vec<RouteTableError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut catch_alls = Vec::new();

    for route in routes {
        if !route.path.starts_with('/') {
            errors.push(RouteTableError::RelativeTopLevel {
                name: route.name.to_string(),
                path: route.path.to_string(),
            });
        }
        walk(route, "", true, &mut names, &mut catch_alls, &mut errors);
    }

    match catch_alls.as_slice() {
        [] => errors.push(RouteTableError::MissingCatchAll),
        [only] => {
            let is_last = routes.last().map(|r| r.name) == Some(only.as_str());
            if !is_last {
                errors.push(RouteTableError::CatchAllNotLast(only.clone()));
            }
        }
        many => errors.push(RouteTableError::MultipleCatchAll(many.to_vec())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn walk(
    route: &RouteDef,
    parent: &str,
    top_level: bool,
    names: &mut HashSet<&'static str>,
    catch_alls: &mut Vec<String>,
    errors: &mut Vec<RouteTableError>,
) {
    if !names.insert(route.name) {
        errors.push(RouteTableError::DuplicateName(route.name.to_string()));
    }

    if !top_level && route.path.starts_with('/') {
        errors.push(RouteTableError::AbsoluteChild {
            name: route.name.to_string(),
            path: route.path.to_string(),
        });
    }

    let full = if top_level {
        route.path.to_string()
    } else {
        join_paths(parent, route.path)
    };

    match PathPattern::parse(&full) {
        Ok(pattern) if pattern.is_catch_all() => catch_alls.push(route.name.to_string()),
        Ok(_) => {}
        Err(source) => errors.push(RouteTableError::Pattern {
            name: route.name.to_string(),
            source,
        }),
    }

    for child in route.children {
        walk(child, &full, false, names, catch_alls, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(routes: &[RouteDef], out: &mut Vec<&'static str>) {
        for route in routes {
            out.push(route.name);
            names(route.children, out);
        }
    }

    #[test]
    fn test_app_routes_are_valid() {
        assert_eq!(validate(app_routes()), Ok(()));
    }

    #[test]
    fn test_exactly_one_catch_all_and_it_is_last() {
        let routes = app_routes();
        let catch_alls: Vec<_> = routes
            .iter()
            .filter(|r| PathPattern::parse(r.path).unwrap().is_catch_all())
            .collect();
        assert_eq!(catch_alls.len(), 1);
        assert_eq!(routes.last().unwrap().name, "NotFound");
        assert_eq!(routes.last().unwrap().path, "/:pathMatch(.*)*");
    }

    #[test]
    fn test_route_names_are_unique() {
        let mut all = Vec::new();
        names(app_routes(), &mut all);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_edit_spend_forwards_props() {
        let main = &app_routes()[0];
        assert_eq!(main.name, "Main");
        assert_eq!(main.children.len(), 1);
        assert!(main.children[0].props);
        assert!(!main.props);
    }

    static DUPLICATE_CHILDREN: [RouteDef; 1] = [RouteDef::new("login", "Login", View::Login)];

    static BROKEN: [RouteDef; 4] = [
        RouteDef::new("/:pathMatch(.*)*", "NotFound", View::NotFound),
        RouteDef::new("/login", "Login", View::Login).with_children(&DUPLICATE_CHILDREN),
        RouteDef::new("register", "Register", View::Register),
        RouteDef::new("/:rest(.*)*", "Fallback", View::NotFound),
    ];

    #[test]
    fn test_validate_reports_every_violation() {
        let errors = validate(&BROKEN).unwrap_err();
        assert!(errors.contains(&RouteTableError::DuplicateName("Login".into())));
        assert!(errors.contains(&RouteTableError::RelativeTopLevel {
            name: "Register".into(),
            path: "register".into(),
        }));
        assert!(errors.contains(&RouteTableError::MultipleCatchAll(vec![
            "NotFound".into(),
            "Fallback".into(),
        ])));
    }

    static NOT_LAST: [RouteDef; 2] = [
        RouteDef::new("/:pathMatch(.*)*", "NotFound", View::NotFound),
        RouteDef::new("/login", "Login", View::Login),
    ];

    static NO_FALLBACK: [RouteDef; 1] = [RouteDef::new("/login", "Login", View::Login)];

    static ABSOLUTE_CHILD: [RouteDef; 1] = [RouteDef::new("/spend/:id", "EditSpend", View::EditSpend)];

    static WITH_ABSOLUTE_CHILD: [RouteDef; 2] = [
        RouteDef::new("/", "Main", View::Main).with_children(&ABSOLUTE_CHILD),
        RouteDef::new("/:pathMatch(.*)*", "NotFound", View::NotFound),
    ];

    #[test]
    fn test_catch_all_placement() {
        assert_eq!(
            validate(&NOT_LAST),
            Err(vec![RouteTableError::CatchAllNotLast("NotFound".into())])
        );
        assert_eq!(
            validate(&NO_FALLBACK),
            Err(vec![RouteTableError::MissingCatchAll])
        );
    }

    #[test]
    fn test_absolute_child_rejected() {
        let errors = validate(&WITH_ABSOLUTE_CHILD).unwrap_err();
        assert_eq!(
            errors,
            vec![RouteTableError::AbsoluteChild {
                name: "EditSpend".into(),
                path: "/spend/:id".into(),
            }]
        );
    }
}
