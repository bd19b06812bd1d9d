//! Parallelism configuration for mechanism fan-out and batch recalculation.

use serde::{Deserialize, Serialize};

/// Default value for parallel processing enabled
fn default_enabled() -> bool {
    true
}

/// Configuration for parallel processing.
///
/// When enabled, the mechanisms of one asset are evaluated concurrently and
/// `recalculate_all` spreads assets over rayon's thread pool.
///
/// # Example
///
/// ```rust
/// use rbi_engine::config::ParallelConfig;
///
/// let config = ParallelConfig {
///     enabled: true,
///     max_concurrency: Some(4),
/// };
/// assert_eq!(config.effective_concurrency(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParallelConfig {
    /// Enable parallel processing (default: true)
    ///
    /// When disabled, everything runs on the calling thread.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum worker threads (default: available cores)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_concurrency: None,
        }
    }
}

impl ParallelConfig {
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// The configured max_concurrency, or the number of available cores.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(num_cpus)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_parallel() {
        let config = ParallelConfig::default();
        assert!(config.enabled);
        assert!(config.effective_concurrency() >= 1);
    }

    #[test]
    fn test_sequential_disables() {
        assert!(!ParallelConfig::sequential().enabled);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ParallelConfig = toml::from_str("max_concurrency = 2").unwrap();
        assert!(config.enabled);
        assert_eq!(config.max_concurrency, Some(2));
    }
}
