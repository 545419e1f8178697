mod common;

use std::fs;

use predicates::prelude::*;
use predicates::str::contains;

use common::{planner_home, script_cli};

#[test]
fn script_mode_runs_reference_scenario() {
    let home = planner_home();
    script_cli(&home)
        .write_stdin("income 10000000\nsaving 20\nunit month\nsummary\nexit\n")
        .assert()
        .success()
        .stdout(contains("Loaded example items"))
        .stdout(contains("Rp 12.800.000"))
        .stdout(contains("Rp 2.000.000"))
        .stdout(contains("7 months"));

    let items = fs::read_to_string(home.join("store").join("items.json")).expect("items file");
    assert!(items.contains("Advan WorkPlus"));
}

#[test]
fn summary_without_income_is_not_available() {
    let home = planner_home();
    script_cli(&home)
        .write_stdin("summary\n")
        .assert()
        .success()
        .stdout(contains("N/A"));
}

#[test]
fn items_survive_restart() {
    let home = planner_home();
    script_cli(&home)
        .write_stdin("config set seed_first_run false\nremove 1\nremove 2\nadd \"Emergency fund\" 3000000 necessities\n")
        .assert()
        .success()
        .stdout(contains("Added #3 Emergency fund (Rp 3.000.000) to Necessities."));

    script_cli(&home)
        .write_stdin("list\ncategories\n")
        .assert()
        .success()
        .stdout(contains("Emergency fund"))
        .stdout(contains("Advan WorkPlus").not())
        .stdout(contains("100,0%"));
}

#[test]
fn invalid_input_reports_errors_and_continues() {
    let home = planner_home();
    script_cli(&home)
        .write_stdin("add Laptop abc\nadd \"   \" 10\nsaving 150\nunit fortnight\nlist\n")
        .assert()
        .success()
        .stdout(contains("Please enter a valid price greater than zero."))
        .stdout(contains("Please enter a valid item name."))
        .stdout(contains("Saving percentage must be a whole number between 1 and 100."))
        .stdout(contains("Unknown time unit `fortnight`"))
        .stdout(contains("Rinjani Mountain"));
}

#[test]
fn unknown_command_suggests_closest() {
    let home = planner_home();
    script_cli(&home)
        .write_stdin("sumary\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `sumary`"))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn theme_follows_os_until_chosen() {
    let home = planner_home();
    script_cli(&home)
        .env("BUDGET_PLANNER_OS_THEME", "dark")
        .write_stdin("theme\ntheme toggle\n")
        .assert()
        .success()
        .stdout(contains("Theme: dark (following system)"))
        .stdout(contains("Theme: light (saved choice)"));

    let theme = fs::read_to_string(home.join("store").join("theme.json")).expect("theme file");
    assert!(theme.contains("light"));

    script_cli(&home)
        .env("BUDGET_PLANNER_OS_THEME", "dark")
        .write_stdin("theme\ntheme system\n")
        .assert()
        .success()
        .stdout(contains("Theme: light (saved choice)"));
    assert!(!home.join("store").join("theme.json").exists());
}

#[test]
fn corrupt_items_file_falls_back_to_empty_ledger() {
    let home = planner_home();
    let store = home.join("store");
    fs::create_dir_all(&store).expect("store dir");
    fs::write(store.join("items.json"), "{ definitely not json").expect("write garbage");

    script_cli(&home)
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(contains("items reset to an empty ledger"))
        .stdout(contains("Unreadable data preserved as `items_corrupt_"))
        .stdout(contains("No items yet."));

    script_cli(&home)
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(contains("No items yet."))
        .stdout(contains("Loaded example items").not());
}

#[test]
fn unusable_data_directory_keeps_working_in_memory() {
    let home = planner_home();
    fs::write(home.join("store"), "not a directory").expect("block store dir");

    script_cli(&home)
        .write_stdin("add Tent 750000\nsummary\n")
        .assert()
        .success()
        .stdout(contains("Could not open the data store"))
        .stdout(contains("Added #3 Tent"))
        .stdout(contains("Total Target"));
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let home = planner_home();
    fs::write(home.join("config.json"), "{ not json").expect("write garbage");

    script_cli(&home)
        .write_stdin("summary\n")
        .assert()
        .success()
        .stdout(contains("using defaults"))
        .stdout(contains("Unreadable data preserved as `config_corrupt_"))
        .stdout(contains("Rp 12.800.000"));
}

#[test]
fn reset_requires_flag_in_scripts() {
    let home = planner_home();
    script_cli(&home)
        .write_stdin("reset\nreset --yes\nlist\n")
        .assert()
        .success()
        .stdout(contains("Reset cancelled."))
        .stdout(contains("Planner reset to defaults."))
        .stdout(contains("No items yet."));
}

#[test]
fn version_prints_build_metadata() {
    let home = planner_home();
    script_cli(&home)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains("Budget Planner"))
        .stdout(contains("Build hash"));
}
