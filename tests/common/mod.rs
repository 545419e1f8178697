use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated planner home for one test.
pub fn planner_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Script-mode CLI bound to `home`, with a light OS theme and no colours.
pub fn script_cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("budget_planner_cli").expect("binary built");
    cmd.env("BUDGET_PLANNER_CLI_SCRIPT", "1")
        .env("BUDGET_PLANNER_HOME", home)
        .env("BUDGET_PLANNER_OS_THEME", "light")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}
