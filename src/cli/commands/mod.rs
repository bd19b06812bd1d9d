//! Handlers for the CLI subcommands.

mod assess;
mod init;
mod lookup;

pub use assess::{handle_assess_command, AssessOptions};
pub use init::handle_init_command;
pub use lookup::{handle_stress_command, handle_tmin_command};

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The command ran but some calculation failed
    CalculationFailed,
}

impl CommandStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::CalculationFailed => 1,
        }
    }
}
