pub mod build_info;

use tracing_subscriber::{fmt, EnvFilter};

/// Directive used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LOG_FILTER: &str = "budget_planner=info,planner_core=warn,planner_storage_json=warn";

/// Installs the global subscriber, writing to stderr so command output stays clean.
pub(crate) fn init_tracing(filter: Option<&str>) {
    let directive = filter.unwrap_or(DEFAULT_LOG_FILTER);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
