use planner_domain::TimeUnit;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "income",
            "Show or set the monthly income",
            "income [<amount>|clear]",
            cmd_income,
        ),
        CommandEntry::new(
            "saving",
            "Show or set the saving percentage (1-100)",
            "saving [<percent>]",
            cmd_saving,
        ),
        CommandEntry::new(
            "unit",
            "Show or set the time unit for the savings horizon",
            "unit [day|week|month|year]",
            cmd_unit,
        ),
        CommandEntry::new(
            "wallet",
            "Show or set the wallet balance",
            "wallet [<amount>]",
            cmd_wallet,
        ),
        CommandEntry::new(
            "reset",
            "Clear all items and restore default settings",
            "reset [--yes]",
            cmd_reset,
        ),
    ]
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => {}
        Some(arg) if arg.eq_ignore_ascii_case("clear") => context.planner.set_income(None)?,
        Some(arg) => context.planner.set_income_text(arg)?,
    }
    match context.planner.settings().income {
        Some(income) => output::info(format!("Monthly income: {}", context.amount(income))),
        None => output::info("Monthly income: not set"),
    }
    Ok(())
}

fn cmd_saving(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(arg) = args.first() {
        context.planner.set_saving_percentage_text(arg)?;
    }
    output::info(format!(
        "Saving percentage: {}",
        context.planner.settings().saving_percentage
    ));
    Ok(())
}

fn cmd_unit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(arg) = args.first() {
        context.planner.set_time_unit_text(arg)?;
    }
    let current = context.planner.settings().time_unit;
    let options: Vec<&str> = TimeUnit::ALL.iter().map(|unit| unit.as_str()).collect();
    output::info(format!(
        "Time unit: {} (options: {})",
        current.as_str(),
        options.join(", ")
    ));
    Ok(())
}

fn cmd_wallet(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(arg) = args.first() {
        context.planner.set_wallet_text(arg)?;
    }
    output::info(format!(
        "Wallet: {}",
        context.amount(context.planner.settings().wallet)
    ));
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let forced = match args.first() {
        None => false,
        Some(&"--yes") | Some(&"-y") => true,
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown option `{other}`; usage: reset [--yes]"
            )))
        }
    };
    if !forced && !context.confirm("Remove all items and restore default settings?")? {
        output::info("Reset cancelled.");
        return Ok(());
    }
    context.planner.reset();
    output::success("Planner reset to defaults.");
    Ok(())
}
