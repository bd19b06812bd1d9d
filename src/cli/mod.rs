//! Command-line interface for the `rbi` binary.

pub mod args;
pub mod commands;
pub mod setup;

pub use args::{parse_args, Cli, Commands};
pub use commands::{
    handle_assess_command, handle_init_command, handle_stress_command, handle_tmin_command,
    AssessOptions, CommandStatus,
};
pub use setup::{configure_thread_pool, resolve_config};
