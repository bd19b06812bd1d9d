//! Report writers for `rbi assess`.
//!
//! Each writer is generic over `W: Write` so tests can render into a
//! `Vec<u8>`.

pub mod json;
pub mod terminal;

use crate::core::AssetId;
use crate::errors::CalcError;
use crate::orchestrator::RiskAssessmentResult;
use serde::Serialize;
use std::io::Write;

pub use json::JsonWriter;
pub use terminal::TerminalWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

/// An asset whose recalculation failed outright.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetFailure {
    pub asset_id: AssetId,
    pub error: CalcError,
}

/// Everything one `assess` run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub results: Vec<RiskAssessmentResult>,
    pub failures: Vec<AssetFailure>,
}

impl AssessmentReport {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (AssetId, Result<RiskAssessmentResult, CalcError>)>,
    {
        let mut report = Self::default();
        for (asset_id, outcome) in outcomes {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(error) => report.failures.push(AssetFailure { asset_id, error }),
            }
        }
        report
    }

    pub fn partial_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_partial()).count()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AssessmentReport) -> anyhow::Result<()>;
}

pub fn create_writer<'a>(format: OutputFormat, writer: Box<dyn Write + 'a>) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}
