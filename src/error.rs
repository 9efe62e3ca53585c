//! Lookup errors shared by the category registry and the page router.

use thiserror::Error;

/// A key was queried outside the closed domain of one of the static tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Category identifier not in the registry.
    #[error("unknown category id: {0}")]
    UnknownCategory(String),

    /// Localized label not in the label index.
    #[error("unknown category label: {0}")]
    UnknownLabel(String),

    /// Route name not in the route table.
    #[error("unknown route name: {0}")]
    UnknownRoute(String),
}

impl LookupError {
    /// Name of the table the miss happened in, used as a metrics label.
    pub fn table(&self) -> &'static str {
        match self {
            LookupError::UnknownCategory(_) => "category_id",
            LookupError::UnknownLabel(_) => "category_label",
            LookupError::UnknownRoute(_) => "route_name",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = LookupError::UnknownCategory("groceries".into());
        assert_eq!(err.to_string(), "unknown category id: groceries");
        assert_eq!(err.table(), "category_id");
    }
}
