//! Runtime setup for the CLI: thread pool and configuration.

use crate::config::{load_config, load_config_validated, EngineConfig};
use crate::errors::CalcError;
use std::path::Path;

/// Configure rayon's global thread pool once at startup.
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        // Already configured, e.g. by an embedding host
        log::debug!("Thread pool already configured: {}", e);
    }
}

/// An explicit `--config` must exist and validate; otherwise `.rbi.toml`
/// is searched for and invalid sections fall back to defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig, CalcError> {
    match explicit {
        Some(path) => load_config_validated(path),
        None => Ok(load_config()),
    }
}
