//! planner-core
//!
//! Business logic for the budget planner: record normalization, the item
//! ledger, projections, persistence synchronization and theme resolution.
//! Depends on planner-domain. No CLI, no terminal I/O, no filesystem access.

pub mod error;
pub mod format;
pub mod ledger;
pub mod normalizer;
pub mod planner;
pub mod projection;
pub mod storage;
pub mod sync;
pub mod theme;

pub use error::{PersistenceError, ValidationError};
pub use ledger::Ledger;
pub use normalizer::{normalize, normalize_all, NormalizeReport};
pub use planner::{Planner, PlannerEvent};
pub use projection::project;
pub use storage::{KeyValueStore, MemoryStore};
pub use sync::{LoadReport, PersistenceSynchronizer, SaveOutcome};
pub use theme::{ColorSchemeSubscription, ColorSchemeWatcher, ThemeResolver};
