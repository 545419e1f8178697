use std::fs;

use planner_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_uses_rupiah_grouping() {
    let cfg = Config::default();

    assert_eq!(cfg.currency_label, "Rp");
    assert_eq!(cfg.grouping_separator, '.');
    assert_eq!(cfg.decimal_separator, ',');
    assert!(cfg.data_dir.is_none());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    assert_eq!(manager.load().expect("load config"), Config::default());
    assert!(!manager.config_path().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(&dir.path().join("nested")).expect("manager");

    let mut cfg = Config::default();
    cfg.set("currency_label", "IDR").expect("set label");
    cfg.set("seed_first_run", "false").expect("set seed");
    cfg.set("log_filter", "budget_planner=debug").expect("set filter");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
    fs::write(manager.config_path(), "{ not json").expect("write garbage");

    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}

#[test]
fn quarantine_moves_unreadable_file_aside() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
    assert_eq!(manager.quarantine().expect("nothing to move"), None);

    fs::write(manager.config_path(), "{ not json").expect("write garbage");
    let name = manager
        .quarantine()
        .expect("rename")
        .expect("file moved");
    assert!(name.starts_with("config_corrupt_"));
    assert!(dir.path().join(&name).exists());
    assert!(!manager.config_path().exists());
    assert_eq!(manager.load().expect("defaults"), Config::default());
}
