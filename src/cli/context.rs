//! Shell state, command dispatch and error reporting.

use std::{
    env, io,
    path::{Path, PathBuf},
};

use dialoguer::{theme::ColorfulTheme, Confirm};
use planner_config::{Config, ConfigError, ConfigManager};
use planner_domain::ThemePreference;
use planner_core::{
    format::{format_amount, format_percent, NumberFormat},
    sync::showcase_seed,
    ColorSchemeWatcher, KeyValueStore, MemoryStore, PersistenceSynchronizer, Planner,
    PlannerEvent, ValidationError,
};
use planner_storage_json::JsonFileStore;
use strsim::levenshtein;

use crate::cli::{commands, output, registry::CommandRegistry};
use crate::errors::CliError;

/// Overrides the data directory (and the config location).
pub const HOME_ENV: &str = "BUDGET_PLANNER_HOME";
/// Forces script mode: commands are read line by line from stdin.
pub const SCRIPT_ENV: &str = "BUDGET_PLANNER_CLI_SCRIPT";
/// `dark` or `light`; stands in for the OS colour-scheme signal.
pub const OS_THEME_ENV: &str = "BUDGET_PLANNER_OS_THEME";

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub planner: Planner,
    watcher: ColorSchemeWatcher,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub data_dir: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Resolves the home directory from `BUDGET_PLANNER_HOME` or `~/.budget_planner`.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        match env::var_os(HOME_ENV) {
            Some(home) => Self::open(mode, PathBuf::from(home), true),
            None => Self::open(mode, Config::default_home(), false),
        }
    }

    /// Opens a shell whose config and data live under `home`.
    pub fn with_home(mode: CliMode, home: &Path) -> Result<Self, CliError> {
        Self::open(mode, home.to_path_buf(), true)
    }

    fn open(mode: CliMode, home: PathBuf, pinned: bool) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(&home).unwrap_or_else(|err| {
            output::warning(format!("Config directory unavailable: {err}"));
            ConfigManager::new(home.join(CONFIG_FILE_NAME))
        });
        let config = load_config(&config_manager);
        crate::init_with_filter(config.log_filter.as_deref());
        output::set_color_enabled(config.ui_color_enabled);

        let data_dir = if pinned {
            home
        } else {
            config.resolve_data_dir(&home)
        };
        let store: Box<dyn KeyValueStore> = match JsonFileStore::open(&data_dir) {
            Ok(store) => Box::new(store),
            Err(err) => {
                tracing::warn!(
                    data_dir = %data_dir.display(),
                    error = %err,
                    "store unavailable, keeping data in memory"
                );
                output::warning(format!(
                    "Could not open the data store ({err}); changes are kept for this session only."
                ));
                Box::new(MemoryStore::new())
            }
        };
        let mut sync = PersistenceSynchronizer::new(store);
        if config.seed_first_run {
            sync = sync.with_seed(showcase_seed());
        }

        let watcher = ColorSchemeWatcher::new(os_prefers_dark());
        let mut planner = Planner::open(sync, &watcher);
        planner.subscribe(|event| {
            if let PlannerEvent::PersistFailed { keys } = event {
                output::warning(format!(
                    "Could not save {}; changes are kept for this session only.",
                    keys.join(", ")
                ));
            }
        });
        tracing::info!(data_dir = %data_dir.display(), ?mode, "shell opened");

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            planner,
            watcher,
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            data_dir,
            last_command: None,
            running: true,
        };
        context.report_load();
        Ok(context)
    }

    fn report_load(&self) {
        let report = self.planner.load_report();
        for warning in &report.warnings {
            output::warning(warning);
        }
        for label in &report.quarantined {
            output::info(format!("Unreadable data preserved as `{label}`."));
        }
        if report.first_run && !report.items.is_empty() {
            output::info("Loaded example items. Use `remove <id>` to clear them.");
        }
    }

    pub fn prompt(&self) -> String {
        "budget> ".to_string()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    fn number_format(&self) -> NumberFormat {
        NumberFormat {
            grouping_separator: self.config.grouping_separator,
            decimal_separator: self.config.decimal_separator,
        }
    }

    /// Amount rendered with the configured label and separators.
    pub fn amount(&self, value: f64) -> String {
        format_amount(&self.config.currency_label, &self.number_format(), value)
    }

    pub fn percent(&self, value: f64) -> String {
        format_percent(&self.number_format(), value)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        self.follow_os_theme(os_prefers_dark());
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Publishes the current OS signal. While no mode has been chosen the
    /// planner follows it and the change is announced.
    pub(crate) fn follow_os_theme(&mut self, prefers_dark: bool) {
        self.watcher.publish(prefers_dark);
        if self.planner.poll_theme() {
            let mode = ThemePreference::from_dark(self.planner.is_dark());
            output::info(format!("Theme: {mode} (following system)"));
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    /// Asks before destructive actions. Scripts cannot answer prompts and
    /// must pass an explicit flag instead.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(false);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(self.confirm("Exit shell?")?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Releases the OS theme subscription before the shell exits.
    pub(crate) fn shutdown(&mut self) {
        self.planner.teardown();
        self.running = false;
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }
}

/// Reads the config, falling back to defaults when the file is unreadable.
/// A malformed file is moved aside so the next save starts clean.
fn load_config(manager: &ConfigManager) -> Config {
    match manager.load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                path = %manager.config_path().display(),
                error = %err,
                "config unreadable, using defaults"
            );
            output::warning(format!("Could not read the configuration ({err}); using defaults."));
            if let ConfigError::Serde(_) = err {
                match manager.quarantine() {
                    Ok(Some(name)) => output::info(format!("Unreadable data preserved as `{name}`.")),
                    Ok(None) => {}
                    Err(err) => tracing::warn!(error = %err, "could not move the config aside"),
                }
            }
            Config::default()
        }
    }
}

/// Reads the OS preference from `BUDGET_PLANNER_OS_THEME`, then from the
/// terminal's `COLORFGBG` (`fg;bg`, dark when the background is 0-6 or 8).
fn os_prefers_dark() -> bool {
    if let Ok(value) = env::var(OS_THEME_ENV) {
        return value.trim().eq_ignore_ascii_case("dark");
    }
    env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(background_is_dark)
        .unwrap_or(false)
}

fn background_is_dark(colorfgbg: &str) -> Option<bool> {
    let background: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
    Some(background < 7 || background == 8)
}

#[cfg(test)]
pub(crate) fn process_script(home: &Path, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_home(CliMode::Script, home)?;
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(context)
}
