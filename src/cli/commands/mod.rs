pub mod config;
pub mod items;
pub mod settings;
pub mod summary;
pub mod system;
pub mod theme;

use crate::cli::context::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        items::definitions(),
        settings::definitions(),
        summary::definitions(),
        theme::definitions(),
        config::definitions(),
        system::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// Fails with the usage string when `args` has fewer than `min` entries.
pub(crate) fn require_args(args: &[&str], min: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < min {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    Ok(())
}
