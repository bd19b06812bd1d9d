use super::{AssessmentReport, OutputWriter};
use crate::orchestrator::RiskAssessmentResult;
use crate::risk::RiskLevel;
use colored::*;
use comfy_table::{Cell, Color, Table};
use std::io::Write;

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AssessmentReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "RISK ASSESSMENT".bold().cyan())?;
        writeln!(self.writer)?;
        if !report.results.is_empty() {
            writeln!(self.writer, "{}", summary_table(&report.results))?;
        }
        self.write_exclusions(&report.results)?;
        self.write_failures(report)?;
        writeln!(
            self.writer,
            "{} assessed, {} partial, {} failed",
            report.results.len(),
            report.partial_count(),
            report.failures.len()
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_exclusions(&mut self, results: &[RiskAssessmentResult]) -> anyhow::Result<()> {
        let notes: Vec<String> = results
            .iter()
            .flat_map(|result| {
                let asset = result.asset_id.as_str();
                result
                    .design_warnings
                    .iter()
                    .map(move |w| format!("{}: {}", asset, w))
                    .chain(
                        result
                            .exclusions
                            .iter()
                            .map(move |e| format!("{}: {} excluded: {}", asset, e.mechanism.label(), e.error)),
                    )
                    .chain(
                        result
                            .consequence_error
                            .iter()
                            .map(move |e| format!("{}: consequence not computed: {}", asset, e)),
                    )
            })
            .collect();

        if notes.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "{}", "Notes".bold())?;
        for note in notes {
            writeln!(self.writer, "  {} {}", "!".yellow(), note)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_failures(&mut self, report: &AssessmentReport) -> anyhow::Result<()> {
        if !report.has_failures() {
            return Ok(());
        }
        writeln!(self.writer, "{}", "Failed".bold().red())?;
        for failure in &report.failures {
            writeln!(self.writer, "  {} {}", failure.asset_id, failure.error)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
        RiskLevel::VeryHigh => Color::Magenta,
    }
}

fn dash() -> String {
    "-".to_string()
}

pub fn summary_table(results: &[RiskAssessmentResult]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Asset",
        "Governing mechanism",
        "DF",
        "PoF",
        "CoF",
        "Method",
        "Risk",
        "Level",
    ]);

    for result in results {
        let pof = result.pof.as_ref();
        let governing = pof
            .and_then(|p| p.governing_mechanism)
            .map_or_else(|| "baseline".to_string(), |m| m.label().to_string());
        let method = result
            .consequence
            .as_ref()
            .map_or_else(dash, |c| format!("{:?}", c.governing_method));
        let level_cell = match result.risk_level() {
            Some(level) => Cell::new(level.label()).fg(level_color(level)),
            None => Cell::new("incomplete"),
        };

        table.add_row(vec![
            Cell::new(result.asset_id.as_str()),
            Cell::new(pof.map_or_else(dash, |_| governing)),
            Cell::new(pof.map_or_else(dash, |p| format!("{:.2}", p.damage_factor))),
            Cell::new(pof.map_or_else(dash, |p| p.category.to_string())),
            Cell::new(
                result
                    .consequence
                    .as_ref()
                    .map_or_else(dash, |c| c.governing_category.to_string()),
            ),
            Cell::new(method),
            Cell::new(result.risk_category().map_or_else(dash, |c| c.to_string())),
            level_cell,
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::core::MechanismKind;
    use crate::damage::test_support::carbon_steel_pipe;
    use crate::orchestrator::RecalculationOrchestrator;

    fn render(report: &AssessmentReport) -> String {
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer).write_report(report).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_report_lists_assets_and_exclusions() {
        let mut ctx = carbon_steel_pipe();
        ctx.mechanisms.insert(MechanismKind::InternalSccSohic);
        let result = RecalculationOrchestrator::with_reference_table(EngineConfig::default())
            .recalculate(&ctx)
            .unwrap();
        let output = render(&AssessmentReport {
            results: vec![result],
            failures: vec![],
        });

        assert!(output.contains("P-100"));
        assert!(output.contains("Internal SCC/SOHIC excluded"));
        assert!(output.contains("1 assessed, 1 partial, 0 failed"));
    }

    #[test]
    fn test_empty_report() {
        let output = render(&AssessmentReport::default());
        assert!(output.contains("0 assessed, 0 partial, 0 failed"));
    }
}
