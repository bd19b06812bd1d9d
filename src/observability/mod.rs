//! Crash reporting and log setup.
//!
//! The orchestrator records its phase, asset and mechanism in a thread-local
//! context; the panic hook prints that context so a crash names the asset
//! that caused it.
//!
//! ```ignore
//! use rbi_engine::observability::{install_panic_hook, init_tracing};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_tracing(1);
//! }
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_asset,
    set_current_mechanism, set_phase, set_progress, CalculationContext, CalculationPhase,
    ContextGuard,
};
pub use panic_hook::install_panic_hook;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for a `-v` count when `RUST_LOG` is unset.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, writing to stderr. `RUST_LOG` wins over
/// the verbosity count. Calling it twice is harmless.
pub fn init_tracing(verbosity: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(verbosity)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_filters() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(2), "debug");
        assert_eq!(default_filter(9), "trace");
    }
}
