//! Diagnostic logging setup.
//!
//! The filter comes from `RUST_LOG` when set, else from `[logging] level`,
//! else `warn`. Output goes to stderr so stdout stays clean for results.

use tracing_subscriber::EnvFilter;

use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LEVEL: &str = "warn";

/// Resolves the filter directive without installing anything.
pub fn filter_directive(config: Option<&dyn ConfigPort>) -> String {
    resolve_directive(std::env::var(EnvFilter::DEFAULT_ENV).ok(), config)
}

fn resolve_directive(env: Option<String>, config: Option<&dyn ConfigPort>) -> String {
    if let Some(env) = env.filter(|e| !e.trim().is_empty()) {
        return env;
    }
    config
        .and_then(|c| c.get_string("logging", "level"))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Installs the global fmt subscriber. Later calls are no-ops.
pub fn init(config: Option<&dyn ConfigPort>) {
    let filter = EnvFilter::try_new(filter_directive(config))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
