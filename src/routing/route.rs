//! Route definitions and the views they render.

use std::fmt;

use serde::Serialize;

/// A page view the shell can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    Main,
    EditSpend,
    SpendAnalysis,
    Login,
    Register,
    NotFound,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Main => "MainPage",
            View::EditSpend => "EditSpendPage",
            View::SpendAnalysis => "SpendAnalysisPage",
            View::Login => "LoginPage",
            View::Register => "RegisterPage",
            View::NotFound => "NotFoundPage",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the route table.
///
/// Top-level paths are absolute; child paths are relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    /// Unique name used for programmatic navigation.
    pub name: &'static str,
    pub view: View,
    /// Forward matched params to the view as props.
    pub props: bool,
    pub children: &'static [RouteDef],
}

impl RouteDef {
    /// A leaf route without props.
    pub const fn new(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name,
            view,
            props: false,
            children: &[],
        }
    }

    pub const fn with_props(mut self) -> Self {
        self.props = true;
        self
    }

    pub const fn with_children(mut self, children: &'static [RouteDef]) -> Self {
        self.children = children;
        self
    }
}
