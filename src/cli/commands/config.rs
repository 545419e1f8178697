use planner_config::Config;

use crate::cli::commands::require_args;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const SET_USAGE: &str = "config set <key> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change CLI preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None | Some("show") => show(context),
        Some("set") => {
            require_args(&args[1..], 2, SET_USAGE)?;
            set(context, args[1], &args[2..].join(" "))
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`; usage: config [show|set <key> <value>]"
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for key in Config::KEYS {
        output::info(format!("  {:<20} {}", key, context.config.get(key)?));
    }
    output::info(format!(
        "  {:<20} {}",
        "config file",
        context.config_manager.config_path().display()
    ));
    output::info(format!("  {:<20} {}", "store", context.data_dir.display()));
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value)?;
    context.config = updated;
    context.persist_config()?;

    if key == "ui_color_enabled" {
        output::set_color_enabled(context.config.ui_color_enabled);
    }
    output::success(format!("{key} = {}", context.config.get(key)?));
    if matches!(key, "data_dir" | "seed_first_run" | "log_filter") {
        output::hint("This takes effect the next time the shell starts.");
    }
    Ok(())
}
