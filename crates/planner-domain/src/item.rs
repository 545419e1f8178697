//! Budget items and their categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Opaque identifier for a ledger item, unique within one ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Placeholder for records whose persisted id was missing or unusable.
    /// The ledger replaces it with a fresh id when hydrating.
    pub const UNASSIGNED: ItemId = ItemId(0);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().trim_start_matches('#').parse().map(ItemId)
    }
}

/// Spending bucket used for grouping items in summaries and charts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Necessities,
    #[default]
    Wants,
    Investment,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Necessities, Category::Wants, Category::Investment];

    /// Lowercase key used in persisted data.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Necessities => "necessities",
            Category::Wants => "wants",
            Category::Investment => "investment",
        }
    }

    /// Strict match on the persisted key. Unknown keys yield `None`.
    pub fn from_key(value: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|category| category.as_str() == value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Necessities => "Necessities",
            Category::Wants => "Wants",
            Category::Investment => "Investment",
        };
        f.write_str(label)
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "necessities" | "necessity" | "needs" => Ok(Category::Necessities),
            "wants" | "want" => Ok(Category::Wants),
            "investment" | "investments" | "invest" => Ok(Category::Investment),
            _ => Err(UnknownVariant(value.trim().to_string())),
        }
    }
}

/// A desired purchase tracked as a savings target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: Category,
}

impl BudgetItem {
    pub fn new(id: ItemId, name: impl Into<String>, price: f64, category: Category) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category,
        }
    }

    /// Returns a copy carrying a different identifier.
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }
}

impl Displayable for BudgetItem {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.category)
    }
}
