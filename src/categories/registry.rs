//! Spending category registry.
//!
//! # Responsibilities
//! - Hold the closed set of spending categories and their display metadata
//! - Translate between category identifiers and localized labels
//! - Report lookups outside the closed set as explicit misses
//!
//! # Design Decisions
//! - `CATEGORIES` is the only hand-written table; both translation
//!   indexes are derived from it on first access
//! - Global instance lives in a `OnceLock` for the process lifetime

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// A spending category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Housing,
    Entertainment,
    Education,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Entertainment,
        Category::Education,
        Category::Other,
    ];

    /// Stable string identifier (`food`, `transport`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Housing => "housing",
            Category::Entertainment => "entertainment",
            Category::Education => "education",
            Category::Other => "other",
        }
    }

    /// Display metadata for this category.
    pub fn info(&self) -> &'static CategoryInfo {
        // CATEGORIES is declared in the same order as Category::ALL.
        &CATEGORIES[*self as usize]
    }

    /// Localized (Russian) label.
    pub fn label(&self) -> &'static str {
        self.info().label
    }

    /// Icon asset name.
    pub fn icon(&self) -> &'static str {
        self.info().icon
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LookupError::UnknownCategory(s.to_string()))
    }
}

/// Display metadata for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub id: Category,
    /// Label shown to the user.
    pub label: &'static str,
    /// Symbolic icon name resolved by the front end.
    pub icon: &'static str,
}

/// The primary category table.
pub static CATEGORIES: [CategoryInfo; 6] = [
    CategoryInfo { id: Category::Food, label: "Еда", icon: "food" },
    CategoryInfo { id: Category::Transport, label: "Транспорт", icon: "car" },
    CategoryInfo { id: Category::Housing, label: "Жилье", icon: "house" },
    CategoryInfo { id: Category::Entertainment, label: "Развлечения", icon: "game" },
    CategoryInfo { id: Category::Education, label: "Образование", icon: "study" },
    CategoryInfo { id: Category::Other, label: "Другое", icon: "message" },
];

/// Query interface over the category table with derived translation indexes.
#[derive(Debug)]
pub struct CategoryRegistry {
    entries: &'static [CategoryInfo],
    label_to_id: BTreeMap<&'static str, Category>,
    id_to_label: BTreeMap<&'static str, &'static str>,
}

impl CategoryRegistry {
    /// Build a registry and its indexes from a primary table.
    pub fn from_entries(entries: &'static [CategoryInfo]) -> Self {
        let mut label_to_id = BTreeMap::new();
        let mut id_to_label = BTreeMap::new();

        for entry in entries {
            label_to_id.insert(entry.label, entry.id);
            id_to_label.insert(entry.id.as_str(), entry.label);
        }

        Self {
            entries,
            label_to_id,
            id_to_label,
        }
    }

    /// The process-wide registry over `CATEGORIES`.
    pub fn global() -> &'static CategoryRegistry {
        static INSTANCE: OnceLock<CategoryRegistry> = OnceLock::new();
        INSTANCE.get_or_init(|| CategoryRegistry::from_entries(&CATEGORIES))
    }

    /// All entries in declaration order.
    pub fn all(&self) -> &'static [CategoryInfo] {
        self.entries
    }

    /// Metadata for a category identifier.
    pub fn info(&self, id: &str) -> Result<&'static CategoryInfo, LookupError> {
        self.entries
            .iter()
            .find(|entry| entry.id.as_str() == id)
            .ok_or_else(|| LookupError::UnknownCategory(id.to_string()))
    }

    /// Category identifier for a localized label.
    pub fn id_for_label(&self, label: &str) -> Result<Category, LookupError> {
        self.label_to_id
            .get(label)
            .copied()
            .ok_or_else(|| LookupError::UnknownLabel(label.to_string()))
    }

    /// Localized label for a category identifier.
    pub fn label_for_id(&self, id: &str) -> Result<&'static str, LookupError> {
        self.id_to_label
            .get(id)
            .copied()
            .ok_or_else(|| LookupError::UnknownCategory(id.to_string()))
    }

    /// Label → identifier index.
    pub fn label_to_id(&self) -> &BTreeMap<&'static str, Category> {
        &self.label_to_id
    }

    /// Identifier → label index.
    pub fn id_to_label(&self) -> &BTreeMap<&'static str, &'static str> {
        &self.id_to_label
    }
}
