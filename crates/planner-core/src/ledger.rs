//! Ordered collection of budget items with add/remove validation.

use std::collections::HashSet;

use planner_domain::{BudgetItem, Category, ItemId};

use crate::error::ValidationError;

/// Largest persisted id kept as-is during hydration (2^53 - 1, the largest
/// integer older JSON writers could represent exactly).
pub const MAX_PERSISTED_ID: u64 = (1 << 53) - 1;

/// In-memory ledger of savings targets. Insertion order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    items: Vec<BudgetItem>,
    next_id: u64,
    revision: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Builds a ledger from restored records, keeping their order.
    ///
    /// Persisted ids are kept when usable. Unassigned, oversized or duplicate
    /// ids are replaced with fresh ones allocated above the highest kept id.
    pub fn hydrate(records: impl IntoIterator<Item = BudgetItem>) -> Self {
        let records: Vec<BudgetItem> = records
            .into_iter()
            .filter(|item| validate_name(&item.name).is_ok() && validate_price(item.price).is_ok())
            .collect();

        let highest = records
            .iter()
            .map(|item| item.id)
            .filter(|id| is_keepable(*id))
            .max()
            .map_or(0, ItemId::value);

        let mut ledger = Self {
            items: Vec::with_capacity(records.len()),
            next_id: highest + 1,
            revision: 0,
        };
        let mut seen = HashSet::with_capacity(records.len());
        for item in records {
            let item = if is_keepable(item.id) && seen.insert(item.id) {
                item
            } else {
                let fresh = ledger.allocate_id();
                tracing::debug!(old = %item.id, new = %fresh, "re-keyed restored item");
                seen.insert(fresh);
                item.with_id(fresh)
            };
            ledger.items.push(item);
        }
        ledger
    }

    /// Validates and appends a new item. A missing category defaults to `wants`.
    pub fn add(
        &mut self,
        name: &str,
        price: f64,
        category: Option<Category>,
    ) -> Result<BudgetItem, ValidationError> {
        let name = validate_name(name)?;
        let price = validate_price(price)?;
        let item = BudgetItem::new(self.allocate_id(), name, price, category.unwrap_or_default());
        self.items.push(item.clone());
        self.revision += 1;
        Ok(item)
    }

    /// Same as [`Ledger::add`] for raw text input.
    pub fn add_parsed(
        &mut self,
        name: &str,
        price: &str,
        category: Option<&str>,
    ) -> Result<BudgetItem, ValidationError> {
        validate_name(name)?;
        let price = parse_price(price)?;
        let category = category.map(parse_category).transpose()?;
        self.add(name, price, category)
    }

    /// Removes the item with `id`. Returns `false` when no such item exists.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let Some(position) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        self.items.remove(position);
        self.revision += 1;
        true
    }

    /// Drops every item. The id counter keeps counting so ids stay unique
    /// for the rest of the session.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.revision += 1;
        }
    }

    pub fn items(&self) -> &[BudgetItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &BudgetItem> {
        self.items.iter()
    }

    pub fn get(&self, id: ItemId) -> Option<&BudgetItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Counts successful mutations since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn allocate_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn is_keepable(id: ItemId) -> bool {
    id.is_assigned() && id.value() <= MAX_PERSISTED_ID
}

/// Trims `name` and rejects it when nothing is left.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    Ok(trimmed.to_string())
}

/// Accepts finite prices strictly greater than zero.
pub fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(ValidationError::InvalidPrice)
    }
}

/// Parses user text as a price. Non-numeric text is an invalid price.
pub fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidPrice)
        .and_then(validate_price)
}

pub fn parse_category(raw: &str) -> Result<Category, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::InvalidCategory(raw.trim().to_string()))
}
