#![doc(test(attr(deny(warnings))))]

//! Budget Planner tracks savings targets, projects how long the configured
//! savings rate needs to cover them and exposes everything through a small
//! command shell.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing once. `filter` replaces the default directive
/// unless `RUST_LOG` is set.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::debug!("budget planner tracing initialized");
    });
}
