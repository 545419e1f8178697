use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show total target, savings rate and time to target",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "categories",
            "Show totals per category",
            "categories",
            cmd_categories,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let projection = context.planner.projection();
    let settings = context.planner.settings();

    output::section("Summary");
    output::info(format!(
        "  Total Target       : {}",
        context.amount(projection.total_target)
    ));
    output::info(format!(
        "  Savings per {:<7}: {}",
        projection.time_unit.to_string(),
        context.amount(projection.savings_per_unit)
    ));
    output::info(format!(
        "  Time to Target     : {}",
        projection.describe_time_to_target()
    ));
    output::info(format!("  Wallet             : {}", context.amount(settings.wallet)));
    if !projection.is_determinable() {
        output::hint("Set a monthly income with `income <amount>` to see the time to target.");
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let shares = context.planner.projection().category_shares();
    output::section("Category breakdown");
    for share in shares {
        output::info(format!(
            "  {:<12} {:>16}  {:>6}",
            share.category.to_string(),
            context.amount(share.total),
            context.percent(share.percent)
        ));
    }
    Ok(())
}
