//! Single mutation boundary for presentation code.
//!
//! Every successful mutation refreshes the cached projection, persists the
//! full state and notifies listeners. Persistence failures are reported as
//! events and never undo the in-memory change.

use planner_domain::{
    BudgetItem, Category, ItemId, Projection, SavingPercentage, Settings, ThemePreference,
    TimeUnit,
};

use crate::{
    error::ValidationError,
    ledger::Ledger,
    projection::project,
    sync::{LoadReport, PersistenceSynchronizer, SaveOutcome},
    theme::{ColorSchemeWatcher, ThemeResolver},
};

/// Notification emitted after a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    ItemAdded(BudgetItem),
    ItemRemoved(ItemId),
    SettingsChanged,
    ThemeChanged { dark: bool },
    Reset,
    PersistFailed { keys: Vec<&'static str> },
}

pub type PlannerListener = Box<dyn FnMut(&PlannerEvent) + Send>;

pub struct Planner {
    ledger: Ledger,
    settings: Settings,
    projection: Projection,
    theme: ThemeResolver,
    sync: PersistenceSynchronizer,
    load_report: LoadReport,
    listeners: Vec<PlannerListener>,
}

impl Planner {
    /// Restores state from the synchronizer's store and resolves the theme.
    pub fn open(sync: PersistenceSynchronizer, watcher: &ColorSchemeWatcher) -> Self {
        let load_report = sync.load();
        let ledger = Ledger::hydrate(load_report.items.iter().cloned());
        let settings = load_report.settings.clone();
        let theme = ThemeResolver::resolve(settings.theme, watcher);
        let projection = project(ledger.items(), &settings);
        Self {
            ledger,
            settings,
            projection,
            theme,
            sync,
            load_report,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&PlannerEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// What was restored or repaired at startup.
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn items(&self) -> &[BudgetItem] {
        self.ledger.items()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn add_item(
        &mut self,
        name: &str,
        price: f64,
        category: Option<Category>,
    ) -> Result<BudgetItem, ValidationError> {
        let item = self.ledger.add(name, price, category)?;
        tracing::debug!(id = %item.id, name = %item.name, "item added");
        self.commit(PlannerEvent::ItemAdded(item.clone()));
        Ok(item)
    }

    pub fn add_item_parsed(
        &mut self,
        name: &str,
        price: &str,
        category: Option<&str>,
    ) -> Result<BudgetItem, ValidationError> {
        let item = self.ledger.add_parsed(name, price, category)?;
        tracing::debug!(id = %item.id, name = %item.name, "item added");
        self.commit(PlannerEvent::ItemAdded(item.clone()));
        Ok(item)
    }

    /// Removes an item. Unknown ids are a silent no-op and return `None`.
    pub fn remove_item(&mut self, id: ItemId) -> Option<BudgetItem> {
        let removed = self.ledger.get(id).cloned()?;
        self.ledger.remove(id);
        tracing::debug!(id = %id, "item removed");
        self.commit(PlannerEvent::ItemRemoved(id));
        Some(removed)
    }

    /// `None` clears the income, making the horizon undeterminable.
    pub fn set_income(&mut self, income: Option<f64>) -> Result<(), ValidationError> {
        if let Some(income) = income {
            if !income.is_finite() || income < 0.0 {
                return Err(ValidationError::InvalidIncome);
            }
        }
        self.settings.income = income;
        self.commit(PlannerEvent::SettingsChanged);
        Ok(())
    }

    /// Empty text clears the income, like an emptied form field.
    pub fn set_income_text(&mut self, raw: &str) -> Result<(), ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return self.set_income(None);
        }
        let income = raw
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidIncome)?;
        self.set_income(Some(income))
    }

    pub fn set_saving_percentage(&mut self, percent: i64) -> Result<(), ValidationError> {
        let percent = u8::try_from(percent)
            .ok()
            .and_then(SavingPercentage::new)
            .ok_or(ValidationError::InvalidPercentage)?;
        self.settings.saving_percentage = percent;
        self.commit(PlannerEvent::SettingsChanged);
        Ok(())
    }

    pub fn set_saving_percentage_text(&mut self, raw: &str) -> Result<(), ValidationError> {
        let percent = raw
            .trim()
            .trim_end_matches('%')
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidPercentage)?;
        self.set_saving_percentage(percent)
    }

    pub fn set_time_unit(&mut self, unit: TimeUnit) {
        self.settings.time_unit = unit;
        self.commit(PlannerEvent::SettingsChanged);
    }

    pub fn set_time_unit_text(&mut self, raw: &str) -> Result<TimeUnit, ValidationError> {
        let unit = TimeUnit::parse_loose(raw)
            .ok_or_else(|| ValidationError::InvalidTimeUnit(raw.trim().to_string()))?;
        self.set_time_unit(unit);
        Ok(unit)
    }

    pub fn set_wallet(&mut self, wallet: f64) -> Result<(), ValidationError> {
        if !wallet.is_finite() {
            return Err(ValidationError::InvalidWallet);
        }
        self.settings.wallet = wallet;
        self.commit(PlannerEvent::SettingsChanged);
        Ok(())
    }

    pub fn set_wallet_text(&mut self, raw: &str) -> Result<(), ValidationError> {
        let wallet = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidWallet)?;
        self.set_wallet(wallet)
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn theme_preference(&self) -> Option<ThemePreference> {
        self.theme.preference()
    }

    pub fn is_following_os_theme(&self) -> bool {
        self.theme.is_tracking_os()
    }

    /// Flips the mode and stores the new explicit choice.
    pub fn toggle_theme(&mut self) -> ThemePreference {
        let preference = self.theme.toggle();
        self.apply_theme_choice();
        preference
    }

    pub fn set_theme(&mut self, preference: ThemePreference) {
        self.theme.choose(preference);
        self.apply_theme_choice();
    }

    /// Drops the stored choice; the next session follows the OS again.
    pub fn clear_theme_preference(&mut self) {
        self.theme.clear_preference();
        self.settings.theme = None;
        self.persist();
    }

    /// Applies pending OS colour-scheme changes. Returns `true` when the mode flipped.
    pub fn poll_theme(&mut self) -> bool {
        let changed = self.theme.poll();
        if changed {
            let dark = self.theme.is_dark();
            tracing::debug!(dark, "following os colour scheme");
            self.emit(&PlannerEvent::ThemeChanged { dark });
        }
        changed
    }

    /// Empties the ledger and restores default settings. The theme choice is kept.
    pub fn reset(&mut self) {
        self.ledger.clear();
        self.settings = Settings {
            theme: self.settings.theme,
            ..Settings::default()
        };
        tracing::info!("planner reset to defaults");
        self.commit(PlannerEvent::Reset);
    }

    /// Releases the OS theme subscription.
    pub fn teardown(&mut self) {
        self.theme.teardown();
    }

    fn apply_theme_choice(&mut self) {
        self.settings.theme = self.theme.preference();
        let dark = self.theme.is_dark();
        tracing::debug!(dark, "theme chosen");
        self.persist();
        self.emit(&PlannerEvent::ThemeChanged { dark });
    }

    fn commit(&mut self, event: PlannerEvent) {
        self.projection = project(self.ledger.items(), &self.settings);
        self.persist();
        self.emit(&event);
    }

    fn persist(&mut self) {
        let outcome: SaveOutcome = self.sync.save(self.ledger.items(), &self.settings);
        if !outcome.is_complete() {
            let keys = outcome.failures.iter().map(|(key, _)| *key).collect();
            self.emit(&PlannerEvent::PersistFailed { keys });
        }
    }

    fn emit(&mut self, event: &PlannerEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::storage::{keys, MemoryStore};

    fn open(store: &MemoryStore) -> Planner {
        Planner::open(
            PersistenceSynchronizer::new(Box::new(store.clone())),
            &ColorSchemeWatcher::new(false),
        )
    }

    fn recorder(planner: &mut Planner) -> Arc<Mutex<Vec<PlannerEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        planner.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        events
    }

    #[test]
    fn mutations_refresh_projection_and_persist() {
        let store = MemoryStore::new();
        let mut planner = open(&store);
        planner.set_income(Some(10_000_000.0)).unwrap();
        planner.add_item("Laptop", 7_800_000.0, None).unwrap();
        planner.add_item("Trip", 5_000_000.0, None).unwrap();

        assert_eq!(planner.projection().time_to_target, 7);
        assert_eq!(store.raw(keys::INCOME).as_deref(), Some("10000000"));
        let reopened = open(&store);
        assert_eq!(reopened.items().len(), 2);
        assert_eq!(reopened.projection(), planner.projection());
    }

    #[test]
    fn rejected_input_changes_nothing() {
        let store = MemoryStore::new();
        let mut planner = open(&store);
        let events = recorder(&mut planner);

        assert_eq!(
            planner.add_item_parsed("", "100", None),
            Err(ValidationError::InvalidName)
        );
        assert_eq!(
            planner.set_income_text("lots"),
            Err(ValidationError::InvalidIncome)
        );
        assert_eq!(
            planner.set_saving_percentage(0),
            Err(ValidationError::InvalidPercentage)
        );
        assert_eq!(
            planner.set_saving_percentage_text("101%"),
            Err(ValidationError::InvalidPercentage)
        );
        assert!(matches!(
            planner.set_time_unit_text("fortnight"),
            Err(ValidationError::InvalidTimeUnit(_))
        ));
        assert_eq!(planner.set_wallet(f64::NAN), Err(ValidationError::InvalidWallet));

        assert!(events.lock().unwrap().is_empty());
        assert_eq!(store.write_count(), 0);
        assert_eq!(planner.settings(), &Settings::default());
    }

    #[test]
    fn text_setters_accept_form_input() {
        let mut planner = open(&MemoryStore::new());
        planner.set_income_text(" 1500000 ").unwrap();
        planner.set_saving_percentage_text("35%").unwrap();
        assert_eq!(planner.set_time_unit_text("Weeks").unwrap(), TimeUnit::Week);
        planner.set_wallet_text("-250").unwrap();

        let settings = planner.settings();
        assert_eq!(settings.income, Some(1_500_000.0));
        assert_eq!(settings.saving_percentage.get(), 35);
        assert_eq!(settings.wallet, -250.0);

        planner.set_income_text("").unwrap();
        assert_eq!(planner.settings().income, None);
        assert_eq!(planner.projection().describe_time_to_target(), "N/A");
    }

    #[test]
    fn remove_unknown_id_emits_nothing() {
        let mut planner = open(&MemoryStore::new());
        let events = recorder(&mut planner);
        assert_eq!(planner.remove_item(ItemId(42)), None);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn write_failures_are_reported_without_rollback() {
        let store = MemoryStore::new();
        let mut planner = open(&store);
        let events = recorder(&mut planner);
        store.fail_writes(true);

        let item = planner.add_item("Bike", 300.0, Some(Category::Necessities)).unwrap();
        assert_eq!(planner.items(), &[item.clone()]);

        let events = events.lock().unwrap();
        assert_eq!(events[0], PlannerEvent::ItemAdded(item));
        assert!(matches!(
            &events[1],
            PlannerEvent::PersistFailed { keys: failed } if failed.contains(&keys::ITEMS)
        ));
    }

    #[test]
    fn theme_choice_is_persisted_and_stops_os_tracking() {
        let store = MemoryStore::new();
        let watcher = ColorSchemeWatcher::new(true);
        let mut planner = Planner::open(
            PersistenceSynchronizer::new(Box::new(store.clone())),
            &watcher,
        );
        assert!(planner.is_dark());
        assert!(planner.is_following_os_theme());

        assert_eq!(planner.toggle_theme(), ThemePreference::Light);
        assert_eq!(store.raw(keys::THEME).as_deref(), Some("light"));
        assert_eq!(watcher.subscriber_count(), 0);

        watcher.publish(false);
        watcher.publish(true);
        assert!(!planner.poll_theme());
        assert!(!planner.is_dark());

        planner.clear_theme_preference();
        assert_eq!(store.raw(keys::THEME), None);
        assert_eq!(planner.theme_preference(), None);
    }

    #[test]
    fn os_changes_are_followed_without_writing() {
        let store = MemoryStore::new();
        let watcher = ColorSchemeWatcher::new(false);
        let mut planner = Planner::open(
            PersistenceSynchronizer::new(Box::new(store.clone())),
            &watcher,
        );
        let events = recorder(&mut planner);

        watcher.publish(true);
        assert!(planner.poll_theme());
        assert!(planner.is_dark());
        assert_eq!(
            events.lock().unwrap().as_slice(),
            &[PlannerEvent::ThemeChanged { dark: true }]
        );
        assert_eq!(store.write_count(), 0);

        planner.teardown();
        assert_eq!(watcher.subscriber_count(), 0);
    }

    #[test]
    fn reset_keeps_theme_choice() {
        let store = MemoryStore::new();
        let mut planner = open(&store);
        planner.set_theme(ThemePreference::Dark);
        planner.add_item("A", 1.0, None).unwrap();
        planner.set_wallet(5.0).unwrap();

        planner.reset();
        assert!(planner.items().is_empty());
        assert_eq!(planner.settings().wallet, 1_000_000.0);
        assert_eq!(planner.settings().theme, Some(ThemePreference::Dark));
        assert_eq!(store.raw(keys::ITEMS).as_deref(), Some("[]"));
    }

    #[test]
    fn ids_are_not_reused_after_reset() {
        let store = MemoryStore::new();
        let mut planner = open(&store);
        let before = planner.add_item("A", 1.0, None).unwrap();
        planner.reset();
        let after = planner.add_item("B", 1.0, None).unwrap();
        assert_ne!(before.id, after.id);
    }
}
