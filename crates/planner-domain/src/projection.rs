//! Derived financial summary. Never persisted.

use serde::{Deserialize, Serialize};

use crate::{common::TimeUnit, item::Category};

/// Per-category price sums. Every category is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub necessities: f64,
    pub wants: f64,
    pub investment: f64,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Necessities => self.necessities,
            Category::Wants => self.wants,
            Category::Investment => self.investment,
        }
    }

    pub fn add(&mut self, category: Category, amount: f64) {
        match category {
            Category::Necessities => self.necessities += amount,
            Category::Wants => self.wants += amount,
            Category::Investment => self.investment += amount,
        }
    }

    /// Iterates `(category, total)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn sum(&self) -> f64 {
        self.necessities + self.wants + self.investment
    }
}

/// One slice of a category breakdown, as consumed by chart widgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: f64,
    pub percent: f64,
}

/// Totals, savings rate and horizon derived from the ledger and settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub total_target: f64,
    pub category_totals: CategoryTotals,
    pub monthly_saving: f64,
    pub time_unit: TimeUnit,
    pub savings_per_unit: f64,
    /// Number of `time_unit` periods needed; `0` when undeterminable.
    pub time_to_target: u64,
}

impl Projection {
    /// `false` when no positive savings rate exists, in which case
    /// `time_to_target` carries no numeric meaning.
    pub fn is_determinable(&self) -> bool {
        self.savings_per_unit > 0.0
    }

    /// Human readable horizon, e.g. `"7 months"`, or `"N/A"`.
    pub fn describe_time_to_target(&self) -> String {
        if !self.is_determinable() {
            return "N/A".into();
        }
        format!(
            "{} {}",
            self.time_to_target,
            self.time_unit.pluralize(self.time_to_target)
        )
    }

    /// Share of the total target held by each category, in percent.
    pub fn category_shares(&self) -> Vec<CategoryShare> {
        self.category_totals
            .iter()
            .map(|(category, total)| CategoryShare {
                category,
                total,
                percent: if self.total_target > 0.0 {
                    total / self.total_target * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }
}
