pub mod commands;
pub mod context;
mod help;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliMode, CommandError, CommandResult, ShellContext};
pub use shell::run_cli;
