use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rbi")]
#[command(about = "Risk-based inspection damage-factor and risk-assessment engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recalculate risk for every asset in a JSON file
    Assess {
        /// JSON file holding one asset or an array of assets
        assets: PathBuf,

        /// JSON allowable-stress rows; defaults to the built-in dataset
        #[arg(long = "stress-table")]
        stress_table: Option<PathBuf>,

        /// Configuration file (otherwise `.rbi.toml` is searched for)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also persist each result as JSON into this directory
        #[arg(long)]
        persist: Option<PathBuf>,

        /// Worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        /// Evaluate assets and mechanisms sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,
    },

    /// Look up the allowable stress for a material at a temperature
    Stress {
        #[arg(short, long)]
        material: String,

        /// Temperature in °C
        #[arg(short, long, allow_hyphen_values = true)]
        temperature: f64,

        #[arg(long = "stress-table")]
        stress_table: Option<PathBuf>,
    },

    /// Minimum required wall thickness from the thin-wall relation
    Tmin {
        /// Design pressure (MPa)
        #[arg(long)]
        pressure: f64,

        /// Allowable stress (MPa)
        #[arg(long)]
        stress: f64,

        /// Weld joint efficiency in (0, 1]
        #[arg(long, default_value = "1.0")]
        efficiency: f64,

        /// Internal diameter (mm)
        #[arg(long)]
        diameter: f64,
    },

    /// Write a default `.rbi.toml`
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assess_defaults() {
        let cli = Cli::try_parse_from(["rbi", "assess", "assets.json"]).unwrap();
        match cli.command {
            Commands::Assess {
                format, jobs, no_parallel, ..
            } => {
                assert_eq!(format, OutputFormat::Terminal);
                assert_eq!(jobs, 0);
                assert!(!no_parallel);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_negative_temperature_is_accepted() {
        let cli = Cli::try_parse_from([
            "rbi", "stress", "--material", "SA-333-6", "--temperature", "-40",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Stress { temperature, .. } if temperature == -40.0));
    }
}
