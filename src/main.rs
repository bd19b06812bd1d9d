use anyhow::Result;
use rbi_engine::cli::{
    handle_assess_command, handle_init_command, handle_stress_command, handle_tmin_command,
    parse_args, AssessOptions, CommandStatus, Commands,
};
use rbi_engine::errors::CalcError;
use rbi_engine::observability::{init_tracing, install_panic_hook};
use std::process::ExitCode;

fn main() -> ExitCode {
    install_panic_hook();
    let cli = parse_args();
    init_tracing(cli.verbosity);

    match run(cli.command) {
        Ok(status) => ExitCode::from(status.exit_code() as u8),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code_for(&err) as u8)
        }
    }
}

fn run(command: Commands) -> Result<CommandStatus> {
    match command {
        Commands::Assess {
            assets,
            stress_table,
            config,
            format,
            output,
            persist,
            jobs,
            no_parallel,
        } => handle_assess_command(AssessOptions {
            assets,
            stress_table,
            config,
            format,
            output,
            persist,
            jobs,
            no_parallel,
        }),
        Commands::Stress {
            material,
            temperature,
            stress_table,
        } => handle_stress_command(&material, temperature, stress_table.as_deref()),
        Commands::Tmin {
            pressure,
            stress,
            efficiency,
            diameter,
        } => handle_tmin_command(pressure, stress, efficiency, diameter),
        Commands::Init { force } => handle_init_command(force),
    }
}

/// Configuration errors exit with 3, everything else with 1.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CalcError>())
        .map_or(1, CalcError::exit_code)
}
