//! Sequential combine run.
//!
//! Reports are processed one at a time. Each file is read once; its rows go
//! to the violation extractor and, as sections, to the workbook. A failure
//! on one file is logged and the run moves on to the next.

use std::path::{Path, PathBuf};

use report_core::error::{ReportError, Result};
use report_core::settings::Settings;
use report_data::reader::{document_from_rows, find_csv_files, read_rows};
use report_data::summary::ViolationSummary;
use report_data::violations::{extract_violations, ExtractionRules, ViolationTable};
use report_output::summary_json::{write_summary, SummaryReport};
use report_output::violations_csv::{write_violations, ViolationsOutcome};
use report_output::workbook::{CombinedWorkbook, WorkbookOutcome};
use tracing::{error, info, warn};

// ── RunReport ─────────────────────────────────────────────────────────────────

/// Outcome of one combine run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files read and written without error.
    pub processed: usize,
    /// Files that failed, with the error message logged for each.
    pub failed: Vec<(PathBuf, String)>,
    /// Set when the workbook was requested.
    pub workbook: Option<WorkbookOutcome>,
    /// Set when the violations CSV was requested.
    pub violations: Option<ViolationsOutcome>,
    /// Violation counts, computed alongside the violations CSV.
    pub summary: Option<ViolationSummary>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Run the combine pipeline described by `settings`.
///
/// Only a missing input directory or a failure to write one of the outputs
/// aborts the run; per-file problems are logged and counted.
pub fn run(settings: &Settings) -> Result<RunReport> {
    if !settings.input_dir.is_dir() {
        return Err(ReportError::InputDirNotFound(settings.input_dir.clone()));
    }

    let files = find_csv_files(&settings.input_dir);
    if files.is_empty() {
        warn!("No CSV files found in {}", settings.input_dir.display());
    }

    let rules = extraction_rules(settings);
    let mut workbook = settings
        .writes_workbook()
        .then(|| CombinedWorkbook::new(&settings.strip_prefix));
    let mut table = ViolationTable::new();
    let mut report = RunReport::default();

    let extract = settings.writes_violations().then_some(&rules);
    let delimiter = settings.delimiter_byte();

    for path in &files {
        let name = display_name(path);
        match process_file(path, delimiter, extract, workbook.as_mut(), &mut table) {
            Ok(()) => {
                info!("Processed: {}", name);
                report.processed += 1;
            }
            Err(e) => {
                error!("Error processing {}: {}", name, e);
                report.failed.push((path.clone(), e.to_string()));
            }
        }
    }

    if let Some(book) = workbook {
        report.workbook = Some(book.save(&settings.workbook)?);
    }

    if settings.writes_violations() {
        report.violations = Some(write_violations(&table, &settings.violations)?);

        let summary = ViolationSummary::from_table(&table, &rules.rule_column);
        if let Some(path) = settings.summary.as_deref() {
            let doc = SummaryReport::new(&settings.input_dir, report.processed, summary.clone());
            write_summary(&doc, path)?;
            info!("Summary written to {}", path.display());
        }
        report.summary = Some(summary);
    }

    Ok(report)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn extraction_rules(settings: &Settings) -> ExtractionRules {
    ExtractionRules {
        section_marker: settings.section_marker.clone(),
        rule_column: settings.rule_column.clone(),
        excluded_rules: settings.exclude_rules.clone(),
    }
}

/// Read one report and feed it to the requested consumers.
fn process_file(
    path: &Path,
    delimiter: u8,
    rules: Option<&ExtractionRules>,
    workbook: Option<&mut CombinedWorkbook>,
    table: &mut ViolationTable,
) -> Result<()> {
    let rows = read_rows(path, delimiter)?;

    if let Some(rules) = rules {
        table.absorb(extract_violations(&rows, rules));
    }

    if let Some(book) = workbook {
        book.add_document(&document_from_rows(path, rows))?;
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use report_data::reader::parse_rows;
    use tempfile::TempDir;

    const PAGE_A: &str = "\
Summary
URL,https://example.test/admin

Test Results
Rule ID,Impact,WCAG Level
nested-interactive,serious,A
color-contrast,serious,AA
";

    const PAGE_B: &str = "\
Test Results
Rule ID,Impact,WCAG Level
image-alt,critical,A
nested-interactive,serious,A
";

    fn write_file(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn settings_for(input: &Path, out: &Path, extra: &[&str]) -> Settings {
        let mut args: Vec<std::ffi::OsString> = vec![
            "axe-combine".into(),
            "--input-dir".into(),
            input.as_os_str().to_owned(),
            "--workbook".into(),
            out.join("combined.xlsx").into_os_string(),
            "--violations".into(),
            out.join("violations.csv").into_os_string(),
        ];
        args.extend(extra.iter().map(|a| std::ffi::OsString::from(*a)));
        Settings::parse_from(args)
    }

    #[test]
    fn test_run_writes_both_outputs() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(input.path(), "a.csv", PAGE_A);
        write_file(input.path(), "b.csv", PAGE_B);

        let settings = settings_for(input.path(), out.path(), &[]);
        let report = run(&settings).unwrap();

        assert_eq!(report.processed, 2);
        assert!(report.failed.is_empty());
        assert_eq!(report.workbook, Some(WorkbookOutcome::Written { sheets: 2 }));
        assert_eq!(report.violations, Some(ViolationsOutcome::Written { rows: 2 }));

        let text = std::fs::read_to_string(out.path().join("violations.csv")).unwrap();
        let rows = parse_rows(&text, b',').unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["Rule ID", "Impact", "WCAG Level"],
                vec!["color-contrast", "serious", "AA"],
                vec!["image-alt", "critical", "A"],
            ]
        );

        let summary = report.summary.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.excluded, 2);
        assert!(out.path().join("combined.xlsx").is_file());
    }

    #[test]
    fn test_run_continues_after_failing_file() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(input.path(), "a.csv", PAGE_A);
        // Wider than Excel allows, so the sheet cannot be written.
        write_file(input.path(), "b-wide.csv", &"x,".repeat(17_000));
        write_file(input.path(), "c.csv", PAGE_B);

        let settings = settings_for(input.path(), out.path(), &[]);
        let report = run(&settings).unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("b-wide.csv"));
        // The partly written sheet is kept.
        assert_eq!(report.workbook, Some(WorkbookOutcome::Written { sheets: 3 }));
        assert_eq!(report.violations, Some(ViolationsOutcome::Written { rows: 2 }));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_counts_unreadable_file_as_failed() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(input.path(), "a.csv", PAGE_A);
        std::os::unix::fs::symlink(input.path().join("gone.csv"), input.path().join("x.csv"))
            .unwrap();

        let settings = settings_for(input.path(), out.path(), &[]);
        let report = run(&settings).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("x.csv"));
        assert!(report.failed[0].1.contains("Failed to read file"));
        assert_eq!(report.workbook, Some(WorkbookOutcome::Written { sheets: 1 }));
    }

    #[test]
    fn test_run_without_violations_writes_no_csv() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(input.path(), "a.csv", "Summary\nURL,https://example.test\n");

        let settings = settings_for(input.path(), out.path(), &["--mode", "violations"]);
        let report = run(&settings).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.violations, Some(ViolationsOutcome::Empty));
        assert!(report.workbook.is_none());
        assert!(!out.path().join("violations.csv").exists());
        assert!(!out.path().join("combined.xlsx").exists());
    }

    #[test]
    fn test_run_workbook_mode_skips_violations() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(input.path(), "a.csv", PAGE_A);

        let settings = settings_for(input.path(), out.path(), &["--mode", "workbook"]);
        let report = run(&settings).unwrap();

        assert_eq!(report.workbook, Some(WorkbookOutcome::Written { sheets: 1 }));
        assert!(report.violations.is_none());
        assert!(report.summary.is_none());
        assert!(!out.path().join("violations.csv").exists());
    }

    #[test]
    fn test_run_writes_summary_json() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(input.path(), "a.csv", PAGE_A);
        let summary_path = out.path().join("summary.json");

        let settings = settings_for(
            input.path(),
            out.path(),
            &["--summary", summary_path.to_str().unwrap()],
        );
        run(&settings).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["files_processed"], 1);
    }

    #[test]
    fn test_run_missing_input_dir_is_an_error() {
        let out = TempDir::new().unwrap();
        let missing = out.path().join("no-such-results");

        let settings = settings_for(&missing, out.path(), &[]);
        let err = run(&settings).unwrap_err();
        assert!(matches!(err, ReportError::InputDirNotFound(_)));
    }

    #[test]
    fn test_run_empty_directory_writes_nothing() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let settings = settings_for(input.path(), out.path(), &[]);
        let report = run(&settings).unwrap();

        assert_eq!(report.processed, 0);
        assert_eq!(report.workbook, Some(WorkbookOutcome::Empty));
        assert_eq!(report.violations, Some(ViolationsOutcome::Empty));
    }
}
