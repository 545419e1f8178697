use planner_domain::{Displayable, ItemId};

use crate::cli::commands::require_args;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const ADD_USAGE: &str = "add <name> <price> [necessities|wants|investment]";
const REMOVE_USAGE: &str = "remove <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Add a savings target", ADD_USAGE, cmd_add),
        CommandEntry::new("remove", "Remove a savings target by id", REMOVE_USAGE, cmd_remove),
        CommandEntry::new("list", "List savings targets", "list", cmd_list),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, ADD_USAGE)?;
    if args.len() > 3 {
        return Err(CommandError::InvalidArguments(format!(
            "too many arguments; quote names with spaces. usage: {ADD_USAGE}"
        )));
    }
    let item = context
        .planner
        .add_item_parsed(args[0], args[1], args.get(2).copied())?;
    output::success(format!(
        "Added #{} {} ({}) to {}.",
        item.id,
        item.name,
        context.amount(item.price),
        item.category
    ));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, REMOVE_USAGE)?;
    let id: ItemId = args[0]
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid item id `{}`", args[0])))?;
    match context.planner.remove_item(id) {
        Some(item) => output::success(format!("Removed #{} {}.", item.id, item.display_label())),
        None => output::warning(format!("No item with id #{id}.")),
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let items = context.planner.items();
    if items.is_empty() {
        output::info(format!("No items yet. Use `{ADD_USAGE}`."));
        return Ok(());
    }
    output::section("Items");
    let name_width = items.iter().map(|item| item.name.chars().count()).max().unwrap_or(0);
    for item in items {
        output::info(format!(
            "  #{:<6} {:<name_width$}  {:>16}  {}",
            item.id.to_string(),
            item.name,
            context.amount(item.price),
            item.category,
        ));
    }
    Ok(())
}
