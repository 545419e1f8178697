//! planner-config
//!
//! Persistent CLI preferences: where the planner keeps its data, how amounts
//! are labelled and grouped, first-run seeding and the log filter.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, DEFAULT_HOME_DIR_NAME};
