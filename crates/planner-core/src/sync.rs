//! Mirrors the ledger and settings into a [`KeyValueStore`] and restores them.
//!
//! Loading never fails: a missing store yields first-run defaults, and any
//! unreadable or corrupt key falls back to its default while the problem is
//! recorded in the [`LoadReport`]. Saving is whole-value overwrite per key and
//! reports failures without undoing anything in memory.

use planner_domain::{
    BudgetItem, Category, ItemId, SavingPercentage, Settings, TimeUnit,
};
use serde_json::Value;

use crate::{
    error::PersistenceError,
    normalizer::normalize_all,
    storage::{keys, KeyValueStore},
};

/// Items and settings restored at startup, plus what had to be repaired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub items: Vec<BudgetItem>,
    pub settings: Settings,
    /// `true` when the store held no item list at all.
    pub first_run: bool,
    /// Item records discarded by the normalizer.
    pub dropped_records: usize,
    /// Labels of corrupt values moved aside by the backend.
    pub quarantined: Vec<String>,
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Result of one save pass.
#[derive(Debug, Default)]
pub struct SaveOutcome {
    pub written: usize,
    pub failures: Vec<(&'static str, PersistenceError)>,
}

impl SaveOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the write path to the durable store.
pub struct PersistenceSynchronizer {
    store: Box<dyn KeyValueStore>,
    seed: Vec<BudgetItem>,
}

impl PersistenceSynchronizer {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            seed: Vec::new(),
        }
    }

    /// Items to start with when the store has never held a ledger.
    pub fn with_seed(mut self, seed: Vec<BudgetItem>) -> Self {
        self.seed = seed;
        self
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn load(&self) -> LoadReport {
        let mut report = LoadReport::default();
        self.load_items(&mut report);

        let defaults = Settings::default();
        report.settings = Settings {
            income: self
                .read_scalar(keys::INCOME, &mut report.warnings)
                .and_then(|raw| decode_income(&raw, &mut report.warnings)),
            saving_percentage: self
                .read_scalar(keys::SAVING_PERCENTAGE, &mut report.warnings)
                .and_then(|raw| decode_percentage(&raw, &mut report.warnings))
                .unwrap_or(defaults.saving_percentage),
            time_unit: self
                .read_scalar(keys::TIME_UNIT, &mut report.warnings)
                .and_then(|raw| decode_word(keys::TIME_UNIT, &raw, TimeUnit::parse_loose, &mut report.warnings))
                .unwrap_or(defaults.time_unit),
            wallet: self
                .read_scalar(keys::WALLET, &mut report.warnings)
                .and_then(|raw| decode_wallet(&raw, &mut report.warnings))
                .unwrap_or(defaults.wallet),
            theme: self
                .read_scalar(keys::THEME, &mut report.warnings)
                .and_then(|raw| {
                    decode_word(keys::THEME, &raw, |word| word.parse().ok(), &mut report.warnings)
                }),
        };

        for warning in &report.warnings {
            tracing::warn!("{warning}");
        }
        tracing::info!(
            items = report.items.len(),
            dropped = report.dropped_records,
            first_run = report.first_run,
            "planner state loaded"
        );
        report
    }

    /// Overwrites every key with the current state. Never panics or rolls back.
    pub fn save(&self, items: &[BudgetItem], settings: &Settings) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();

        match serde_json::to_string(items) {
            Ok(json) => self.write(keys::ITEMS, Some(json), &mut outcome),
            Err(err) => outcome.failures.push((keys::ITEMS, err.into())),
        }
        self.write(
            keys::INCOME,
            Some(settings.income.map(encode_number).unwrap_or_default()),
            &mut outcome,
        );
        self.write(
            keys::SAVING_PERCENTAGE,
            Some(settings.saving_percentage.get().to_string()),
            &mut outcome,
        );
        self.write(
            keys::TIME_UNIT,
            Some(settings.time_unit.as_str().to_string()),
            &mut outcome,
        );
        self.write(keys::WALLET, Some(encode_number(settings.wallet)), &mut outcome);
        self.write(
            keys::THEME,
            settings.theme.map(|theme| theme.as_str().to_string()),
            &mut outcome,
        );

        for (key, err) in &outcome.failures {
            tracing::warn!(key, error = %err, "failed to persist planner state");
        }
        tracing::debug!(written = outcome.written, "planner state saved");
        outcome
    }

    /// Removes every planner key from the store.
    pub fn clear(&self) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();
        for key in keys::ALL {
            self.write(key, None, &mut outcome);
        }
        for (key, err) in &outcome.failures {
            tracing::warn!(key, error = %err, "failed to clear planner state");
        }
        outcome
    }

    fn write(&self, key: &'static str, value: Option<String>, outcome: &mut SaveOutcome) {
        let result = match value {
            Some(value) => self.store.set(key, &value),
            None => self.store.remove(key),
        };
        match result {
            Ok(()) => outcome.written += 1,
            Err(err) => outcome.failures.push((key, err)),
        }
    }

    fn load_items(&self, report: &mut LoadReport) {
        let raw = match self.store.get(keys::ITEMS) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                report.first_run = true;
                report.items = self.seed.clone();
                return;
            }
            Err(PersistenceError::Unavailable(reason)) => {
                report
                    .warnings
                    .push(format!("items unavailable, starting empty: {reason}"));
                return;
            }
            Err(err) => {
                self.reset_corrupt_items(err, report);
                return;
            }
        };

        let parsed = serde_json::from_str::<Value>(&raw)
            .map_err(PersistenceError::from)
            .and_then(|value| normalize_all(&value));
        match parsed {
            Ok(normalized) => {
                if normalized.dropped > 0 {
                    report.warnings.push(format!(
                        "dropped {} malformed item record(s)",
                        normalized.dropped
                    ));
                }
                report.dropped_records = normalized.dropped;
                report.items = normalized.items;
            }
            Err(err) => self.reset_corrupt_items(err, report),
        }
    }

    fn reset_corrupt_items(&self, err: PersistenceError, report: &mut LoadReport) {
        report
            .warnings
            .push(format!("items reset to an empty ledger: {err}"));
        match self.store.quarantine(keys::ITEMS) {
            Ok(Some(label)) => {
                report.quarantined.push(label);
                // Keep the key present so the next start is not a first run.
                if let Err(err) = self.store.set(keys::ITEMS, "[]") {
                    report
                        .warnings
                        .push(format!("could not rewrite items after quarantine: {err}"));
                }
            }
            Ok(None) => {}
            Err(err) => report
                .warnings
                .push(format!("could not preserve corrupt items: {err}")),
        }
    }

    fn read_scalar(&self, key: &str, warnings: &mut Vec<String>) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warnings.push(format!("{key} unavailable, using default: {err}"));
                None
            }
        }
    }
}

/// Items offered on first run so the summary is not empty.
pub fn showcase_seed() -> Vec<BudgetItem> {
    vec![
        BudgetItem::new(ItemId(1), "Advan WorkPlus", 7_800_000.0, Category::Wants),
        BudgetItem::new(ItemId(2), "Rinjani Mountain", 5_000_000.0, Category::Wants),
    ]
}

/// Older builds wrote scalars unquoted (`month`, `20`); newer values may be
/// JSON. Anything that is not valid JSON is read as a bare string.
fn decode_scalar(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.trim().to_string()))
}

fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn decode_income(raw: &str, warnings: &mut Vec<String>) -> Option<f64> {
    let value = decode_scalar(raw);
    match &value {
        Value::Null => return None,
        Value::String(text) if text.trim().is_empty() => return None,
        _ => {}
    }
    match scalar_number(&value) {
        Some(income) if income.is_finite() && income >= 0.0 => Some(income),
        _ => {
            warnings.push(format!("ignoring invalid income `{raw}`"));
            None
        }
    }
}

fn decode_percentage(raw: &str, warnings: &mut Vec<String>) -> Option<SavingPercentage> {
    match scalar_number(&decode_scalar(raw)) {
        Some(pct) if pct.is_finite() => {
            let clamped = SavingPercentage::clamped(pct.round() as i64);
            if f64::from(clamped.get()) != pct {
                warnings.push(format!("saving percentage `{raw}` adjusted to {clamped}"));
            }
            Some(clamped)
        }
        _ => {
            warnings.push(format!("ignoring invalid saving percentage `{raw}`"));
            None
        }
    }
}

fn decode_wallet(raw: &str, warnings: &mut Vec<String>) -> Option<f64> {
    match scalar_number(&decode_scalar(raw)) {
        Some(wallet) if wallet.is_finite() => Some(wallet),
        _ => {
            warnings.push(format!("ignoring invalid wallet `{raw}`"));
            None
        }
    }
}

fn decode_word<T>(
    key: &str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let parsed = match decode_scalar(raw) {
        Value::String(word) => parse(&word),
        _ => None,
    };
    if parsed.is_none() {
        warnings.push(format!("ignoring invalid {key} `{raw}`"));
    }
    parsed
}

/// Whole amounts are written without a fractional part, as older builds did.
fn encode_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        serde_json::to_string(&value).unwrap_or_else(|_| value.to_string())
    }
}
