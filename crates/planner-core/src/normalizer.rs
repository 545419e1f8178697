//! Turns structurally unknown persisted records into budget items.
//!
//! Records written by older builds may lack `category`, carry `price` as a
//! string, or include fields this build does not know about (`image`,
//! `wallet`, ...). The normalizer fills defaults where it can and drops the
//! record where it cannot; it never repairs a bad name or price.

use planner_domain::{BudgetItem, Category, ItemId};
use serde_json::Value;

use crate::error::PersistenceError;

/// Result of normalizing a whole persisted item array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub items: Vec<BudgetItem>,
    pub dropped: usize,
}

/// Normalizes one raw record. Returns `None` when the record must be dropped.
pub fn normalize(raw: &Value) -> Option<BudgetItem> {
    let record = raw.as_object()?;

    let name = record.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let price = record.get("price").and_then(coerce_price)?;

    let category = record
        .get("category")
        .and_then(Value::as_str)
        .and_then(Category::from_key)
        .unwrap_or_default();

    let id = record
        .get("id")
        .and_then(coerce_id)
        .unwrap_or(ItemId::UNASSIGNED);

    Some(BudgetItem::new(id, name, price, category))
}

/// Applies [`normalize`] to every element of a persisted array, keeping order.
///
/// `null` is read as an empty ledger. Any other non-array document is corrupt.
pub fn normalize_all(raw: &Value) -> Result<NormalizeReport, PersistenceError> {
    let records = match raw {
        Value::Array(records) => records,
        Value::Null => return Ok(NormalizeReport::default()),
        other => {
            return Err(PersistenceError::Corrupt(format!(
                "expected an array of items, found {}",
                kind_of(other)
            )))
        }
    };

    let mut report = NormalizeReport::default();
    for (index, record) in records.iter().enumerate() {
        match normalize(record) {
            Some(item) => report.items.push(item),
            None => {
                tracing::warn!(index, "dropping malformed item record");
                report.dropped += 1;
            }
        }
    }
    Ok(report)
}

fn coerce_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (price.is_finite() && price > 0.0).then_some(price)
}

fn coerce_id(value: &Value) -> Option<ItemId> {
    let raw = match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|raw| raw.fract() == 0.0 && *raw >= 0.0 && *raw <= u64::MAX as f64)
                .map(|raw| raw as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    raw.map(ItemId)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_record_without_category_defaults_to_wants() {
        let item = normalize(&json!({"id": 1_700_000_000_000u64, "name": "Advan WorkPlus", "price": 7_800_000}))
            .expect("record is valid");
        assert_eq!(item.category, Category::Wants);
        assert_eq!(item.id, ItemId(1_700_000_000_000));
        assert_eq!(item.price, 7_800_000.0);
    }

    #[test]
    fn string_price_from_form_input_is_coerced() {
        let item = normalize(&json!({"id": "4", "name": "  Tent ", "price": " 125000 ", "category": "necessities"}))
            .expect("record is valid");
        assert_eq!(item.name, "Tent");
        assert_eq!(item.price, 125_000.0);
        assert_eq!(item.id, ItemId(4));
        assert_eq!(item.category, Category::Necessities);
    }

    #[test]
    fn unknown_category_and_extra_fields_are_tolerated() {
        let item = normalize(&json!({
            "name": "Camera",
            "price": 3.5,
            "category": "luxury",
            "image": "camera.png",
            "futureField": {"nested": true}
        }))
        .expect("record is valid");
        assert_eq!(item.category, Category::Wants);
        assert_eq!(item.id, ItemId::UNASSIGNED);
    }

    #[test]
    fn bad_names_and_prices_are_dropped() {
        assert!(normalize(&json!({"name": "   ", "price": 10})).is_none());
        assert!(normalize(&json!({"price": 10})).is_none());
        assert!(normalize(&json!({"name": 42, "price": 10})).is_none());
        assert!(normalize(&json!({"name": "A", "price": 0})).is_none());
        assert!(normalize(&json!({"name": "A", "price": -5})).is_none());
        assert!(normalize(&json!({"name": "A", "price": "abc"})).is_none());
        assert!(normalize(&json!({"name": "A", "price": "NaN"})).is_none());
        assert!(normalize(&json!({"name": "A", "price": "inf"})).is_none());
        assert!(normalize(&json!({"name": "A", "price": true})).is_none());
        assert!(normalize(&json!({"name": "A"})).is_none());
        assert!(normalize(&json!("not a record")).is_none());
    }

    #[test]
    fn negative_or_fractional_ids_become_unassigned() {
        let negative = normalize(&json!({"id": -3, "name": "A", "price": 1})).unwrap();
        assert_eq!(negative.id, ItemId::UNASSIGNED);
        let fractional = normalize(&json!({"id": 1.5, "name": "A", "price": 1})).unwrap();
        assert_eq!(fractional.id, ItemId::UNASSIGNED);
    }

    #[test]
    fn normalize_all_preserves_order_and_counts_drops() {
        let raw = json!([
            {"id": 1, "name": "A", "price": 10},
            {"id": 2, "name": "", "price": 10},
            {"id": 3, "name": "C", "price": 30, "category": "investment"}
        ]);
        let report = normalize_all(&raw).expect("array input");
        assert_eq!(report.dropped, 1);
        let names: Vec<_> = report.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn normalize_all_reads_null_as_empty_and_rejects_other_shapes() {
        assert_eq!(normalize_all(&Value::Null).unwrap(), NormalizeReport::default());
        let err = normalize_all(&json!({"items": []})).expect_err("object is not an item list");
        assert!(matches!(err, PersistenceError::Corrupt(message) if message.contains("an object")));
    }
}
