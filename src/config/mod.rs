//! Engine configuration loaded from `.rbi.toml`.

mod core;
mod loader;
mod parallel;
pub mod thresholds;
pub mod validation;

pub use self::core::{ConsequenceConfig, EngineConfig, ProbabilityConfig, RecalculationConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from_dir, load_config_validated,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use parallel::ParallelConfig;
pub use thresholds::{band_index, RiskMatrixConfig};
pub use validation::{collect_issues, validate_config, ConfigIssue};
