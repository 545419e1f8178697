//! planner-domain
//!
//! Pure domain models (BudgetItem, Category, Settings, Projection).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod item;
pub mod projection;
pub mod settings;

pub use common::*;
pub use item::*;
pub use projection::*;
pub use settings::*;
