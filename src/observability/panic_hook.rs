//! Panic hook that prints a crash report with the calculation context.

use super::context::{get_current_context, get_progress, CalculationContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str = "════════════════════════════════════════════════════════════════════════════════";

/// Install the crash-report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", crash_report(info));
    }));
}

fn crash_report(info: &PanicHookInfo<'_>) -> String {
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
    let mut report = render_report(
        &extract_panic_message(info),
        location.as_deref(),
        &get_current_context(),
        get_progress(),
    );

    if let Some(metadata) = Span::current().metadata() {
        report.push_str(&format!("  Span: {}\n", metadata.name()));
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        report.push_str(&format!("\n{}\n", std::backtrace::Backtrace::capture()));
    } else {
        report.push_str("  Run with RUST_BACKTRACE=1 for a stack trace\n");
    }
    report.push_str(RULE);
    report
}

fn render_report(
    message: &str,
    location: Option<&str>,
    context: &CalculationContext,
    (processed, total): (usize, usize),
) -> String {
    let mut lines = vec![
        String::new(),
        RULE.to_string(),
        format!("  RBI ENGINE CRASH REPORT (v{})", VERSION),
        format!(
            "  Time: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ),
        RULE.to_string(),
        format!("  PANIC: {}", truncate(message, 68)),
    ];
    if let Some(location) = location {
        lines.push(format!("  Location: {}", location));
    }

    lines.push(match &context.phase {
        Some(phase) => format!("  Phase: {}", phase),
        None => "  Phase: (not set)".to_string(),
    });
    if let Some(asset) = &context.current_asset {
        lines.push(format!("  Asset: {}", asset));
    }
    if let Some(mechanism) = context.current_mechanism {
        lines.push(format!("  Mechanism: {}", mechanism));
    }
    if total > 0 {
        let pct = (processed as f64 / total as f64 * 100.0) as usize;
        lines.push(format!("  Progress: {} / {} assets ({}%)", processed, total, pct));
    }

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MechanismKind;
    use crate::observability::context::CalculationPhase;

    #[test]
    fn test_truncate_long_string() {
        let result = truncate("this is a long string that needs truncation", 20);
        assert_eq!(result.chars().count(), 20);
        assert!(result.ends_with("..."));
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_report_includes_asset_and_mechanism() {
        let context = CalculationContext {
            phase: Some(CalculationPhase::DamageFactors),
            current_asset: Some("V-201".to_string()),
            current_mechanism: Some(MechanismKind::InternalSccSohic),
        };
        let report = render_report("boom", Some("src/lib.rs:1:1"), &context, (3, 10));
        assert!(report.contains("Phase: damage_factors"));
        assert!(report.contains("Asset: V-201"));
        assert!(report.contains("Mechanism: internal_scc_sohic"));
        assert!(report.contains("3 / 10 assets (30%)"));
    }

    #[test]
    fn test_report_without_context() {
        let report = render_report("boom", None, &CalculationContext::new(), (0, 0));
        assert!(report.contains("Phase: (not set)"));
        assert!(!report.contains("Progress"));
    }
}
