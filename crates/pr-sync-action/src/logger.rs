//! Console logging for workflow runs
//!
//! Logs go to stderr without timestamps, the runner already prefixes every
//! line with one. The level comes from `RUST_LOG` when set; otherwise it is
//! `debug` when step debugging is enabled (`RUNNER_DEBUG=1`) and `info`
//! everywhere else.

use env_logger::{Builder, Env};

fn default_filter(runner_debug: Option<&str>) -> &'static str {
    match runner_debug {
        Some("1") => "debug",
        _ => "info",
    }
}

/// Initialize the global logger
pub fn init() {
    let runner_debug = std::env::var("RUNNER_DEBUG").ok();
    let env = Env::default().default_filter_or(default_filter(runner_debug.as_deref()));

    Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
