use super::CommandStatus;
use crate::cli::setup::{configure_thread_pool, resolve_config};
use crate::config::ParallelConfig;
use crate::io::{
    create_writer, AssessmentReport, JsonAssetFile, JsonDirectorySink, JsonStressDataset,
    OutputFormat, ReferenceDataset, ResultSink, StressDataset,
};
use crate::observability::{self, CalculationPhase};
use crate::orchestrator::RecalculationOrchestrator;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AssessOptions {
    pub assets: PathBuf,
    pub stress_table: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub persist: Option<PathBuf>,
    pub jobs: usize,
    pub no_parallel: bool,
}

pub fn handle_assess_command(options: AssessOptions) -> Result<CommandStatus> {
    let mut config = resolve_config(options.config.as_deref())?;
    if options.no_parallel {
        config.parallel = ParallelConfig::sequential();
    } else if options.jobs > 0 {
        config.parallel.max_concurrency = Some(options.jobs);
    }
    if config.parallel.enabled {
        configure_thread_pool(config.parallel.max_concurrency.unwrap_or(0));
        log::debug!(
            "Recalculating on {} worker threads",
            config.parallel.effective_concurrency()
        );
    }

    let table = match &options.stress_table {
        Some(path) => JsonStressDataset::new(path).stress_table()?,
        None => ReferenceDataset.stress_table()?,
    };

    let assets = {
        let _phase = observability::set_phase(CalculationPhase::LoadingAssets);
        JsonAssetFile::open(&options.assets)?.into_assets()
    };
    log::info!("Assessing {} assets", assets.len());

    let orchestrator = RecalculationOrchestrator::new(config, Arc::new(table));
    let outcomes = orchestrator.recalculate_all(&assets);
    let report = AssessmentReport::from_outcomes(
        assets.iter().map(|a| a.asset_id.clone()).zip(outcomes),
    );

    if let Some(dir) = &options.persist {
        let _phase = observability::set_phase(CalculationPhase::Persisting);
        let sink = JsonDirectorySink::new(dir)?;
        for result in &report.results {
            sink.persist(result)?;
        }
    }

    let _phase = observability::set_phase(CalculationPhase::OutputGeneration);
    let writer: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    create_writer(options.format, writer).write_report(&report)?;

    Ok(if report.has_failures() {
        CommandStatus::CalculationFailed
    } else {
        CommandStatus::Success
    })
}
