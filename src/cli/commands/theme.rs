use planner_domain::ThemePreference;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "theme",
        "Show or change dark/light mode",
        "theme [dark|light|toggle|system]",
        cmd_theme,
    )]
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let planner = &mut context.planner;
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => {}
        Some("toggle") => {
            planner.toggle_theme();
        }
        Some("system") => {
            planner.clear_theme_preference();
            output::info("Saved theme cleared; the next session follows the system setting.");
        }
        Some(other) => {
            let preference: ThemePreference = other.parse().map_err(|_| {
                CommandError::InvalidArguments(format!(
                    "unknown theme `{other}`; usage: theme [dark|light|toggle|system]"
                ))
            })?;
            planner.set_theme(preference);
        }
    }

    let mode = ThemePreference::from_dark(planner.is_dark());
    let source = if planner.is_following_os_theme() {
        "following system"
    } else if planner.theme_preference().is_some() {
        "saved choice"
    } else {
        "this session"
    };
    output::info(format!("Theme: {mode} ({source})"));
    Ok(())
}
