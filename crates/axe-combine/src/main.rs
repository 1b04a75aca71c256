mod bootstrap;
mod pipeline;

use anyhow::Result;
use report_core::settings::Settings;
use report_data::summary::ViolationSummary;
use report_output::violations_csv::ViolationsOutcome;
use report_output::workbook::WorkbookOutcome;
use tracing::{info, warn};

fn main() -> Result<()> {
    let settings = Settings::load();
    settings.validate()?;

    bootstrap::ensure_output_dirs(&settings)?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    info!("axe-combine v{} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Input: {}, Mode: {}, Excluded rules: {}",
        settings.input_dir.display(),
        settings.mode,
        settings.exclude_rules.join(", ")
    );

    let report = pipeline::run(&settings)?;

    match report.workbook {
        Some(WorkbookOutcome::Written { sheets }) => info!(
            "Excel file has been created successfully: {} ({} sheets)",
            settings.workbook.display(),
            sheets
        ),
        Some(WorkbookOutcome::Empty) => warn!(
            "No sheets to write; {} was not created",
            settings.workbook.display()
        ),
        None => {}
    }

    match report.violations {
        Some(ViolationsOutcome::Written { rows }) => info!(
            "Created {} with {} violations",
            settings.violations.display(),
            rows
        ),
        Some(ViolationsOutcome::Empty) => info!("No violations found or no headers available"),
        None => {}
    }

    if let Some(summary) = &report.summary {
        log_summary(summary);
    }

    info!(
        "Finished: {} files processed, {} failed",
        report.processed,
        report.failed.len()
    );
    for (path, message) in &report.failed {
        warn!("  {}: {}", path.display(), message);
    }

    Ok(())
}

fn log_summary(summary: &ViolationSummary) {
    info!(
        "Violations: {} kept, {} excluded, {} unique rules",
        summary.total, summary.excluded, summary.unique_rules
    );
    for (impact, count) in &summary.by_impact {
        info!("  impact {}: {}", impact, count);
    }
    for (level, count) in &summary.by_wcag_level {
        info!("  WCAG {}: {}", level, count);
    }
}
