//! Pure projection of totals and savings horizon from items and settings.

use planner_domain::{BudgetItem, CategoryTotals, Projection, Settings, TimeUnit};

/// Days per month used for the daily rate. A fixed approximation, not calendar aware.
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Weeks per month used for the weekly rate.
pub const WEEKS_PER_MONTH: f64 = 4.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Computes the projection. Deterministic, no I/O, safe to call on every render.
pub fn project(items: &[BudgetItem], settings: &Settings) -> Projection {
    let mut category_totals = CategoryTotals::default();
    let mut total_target = 0.0;
    for item in items {
        total_target += item.price;
        category_totals.add(item.category, item.price);
    }

    let monthly_saving = monthly_saving(settings);
    let savings_per_unit = savings_per_unit(monthly_saving, settings.time_unit);

    Projection {
        total_target,
        category_totals,
        monthly_saving,
        time_unit: settings.time_unit,
        savings_per_unit,
        time_to_target: time_to_target(total_target, savings_per_unit),
    }
}

/// Income share set aside each month. Absent income saves nothing.
pub fn monthly_saving(settings: &Settings) -> f64 {
    match settings.income {
        Some(income) => income * settings.saving_percentage.fraction(),
        None => 0.0,
    }
}

pub fn savings_per_unit(monthly_saving: f64, unit: TimeUnit) -> f64 {
    match unit {
        TimeUnit::Day => monthly_saving / DAYS_PER_MONTH,
        TimeUnit::Week => monthly_saving / WEEKS_PER_MONTH,
        TimeUnit::Month => monthly_saving,
        TimeUnit::Year => monthly_saving * MONTHS_PER_YEAR,
    }
}

/// Whole periods needed to cover `total_target`; `0` means undeterminable.
pub fn time_to_target(total_target: f64, savings_per_unit: f64) -> u64 {
    if savings_per_unit > 0.0 {
        (total_target / savings_per_unit).ceil() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_domain::{Category, ItemId, SavingPercentage};

    fn item(id: u64, price: f64, category: Category) -> BudgetItem {
        BudgetItem::new(ItemId(id), format!("item-{id}"), price, category)
    }

    fn settings(income: Option<f64>, pct: u8, unit: TimeUnit) -> Settings {
        Settings {
            income,
            saving_percentage: SavingPercentage::new(pct).unwrap(),
            time_unit: unit,
            ..Settings::default()
        }
    }

    #[test]
    fn reference_scenario() {
        let items = vec![
            item(1, 7_800_000.0, Category::Wants),
            item(2, 5_000_000.0, Category::Wants),
        ];
        let projection = project(&items, &settings(Some(10_000_000.0), 20, TimeUnit::Month));
        assert_eq!(projection.total_target, 12_800_000.0);
        assert_eq!(projection.savings_per_unit, 2_000_000.0);
        assert_eq!(projection.time_to_target, 7);
        assert_eq!(projection.category_totals.wants, 12_800_000.0);
        assert_eq!(projection.category_totals.necessities, 0.0);
        assert_eq!(projection.category_totals.investment, 0.0);
    }

    #[test]
    fn absent_income_is_undeterminable() {
        let items = vec![item(1, 100.0, Category::Wants)];
        let projection = project(&items, &settings(None, 20, TimeUnit::Week));
        assert_eq!(projection.savings_per_unit, 0.0);
        assert_eq!(projection.time_to_target, 0);
        assert_eq!(projection.describe_time_to_target(), "N/A");
    }

    #[test]
    fn zero_income_is_undeterminable() {
        let projection = project(&[item(1, 5.0, Category::Wants)], &settings(Some(0.0), 50, TimeUnit::Day));
        assert_eq!(projection.time_to_target, 0);
        assert!(!projection.is_determinable());
    }

    #[test]
    fn unit_conversions_use_fixed_divisors() {
        assert_eq!(savings_per_unit(3_000.0, TimeUnit::Day), 100.0);
        assert_eq!(savings_per_unit(3_000.0, TimeUnit::Week), 750.0);
        assert_eq!(savings_per_unit(3_000.0, TimeUnit::Month), 3_000.0);
        assert_eq!(savings_per_unit(3_000.0, TimeUnit::Year), 36_000.0);
    }

    #[test]
    fn time_to_target_rounds_up_partial_periods() {
        assert_eq!(time_to_target(10.0, 3.0), 4);
        assert_eq!(time_to_target(9.0, 3.0), 3);
        assert_eq!(time_to_target(0.0, 3.0), 0);
        assert_eq!(time_to_target(10.0, -1.0), 0);
    }

    #[test]
    fn empty_ledger_zero_fills_categories() {
        let projection = project(&[], &settings(Some(1_000.0), 10, TimeUnit::Year));
        assert_eq!(projection.total_target, 0.0);
        assert_eq!(projection.category_totals, CategoryTotals::default());
        assert_eq!(projection.time_to_target, 0);
        assert!(projection.is_determinable());
    }

    #[test]
    fn daily_horizon_counts_days() {
        let items = vec![item(1, 1_000.0, Category::Necessities)];
        // 3_000 per month at 10% is 300 per month, 10 per day.
        let projection = project(&items, &settings(Some(3_000.0), 10, TimeUnit::Day));
        assert_eq!(projection.savings_per_unit, 10.0);
        assert_eq!(projection.time_to_target, 100);
        assert_eq!(projection.describe_time_to_target(), "100 days");
    }

    #[test]
    fn project_is_pure() {
        let items = vec![
            item(1, 12.5, Category::Investment),
            item(2, 99.0, Category::Necessities),
        ];
        let inputs = settings(Some(4_321.0), 37, TimeUnit::Week);
        assert_eq!(project(&items, &inputs), project(&items, &inputs));
    }
}
