//! JSON export of the violation summary.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use report_core::error::{ReportError, Result};
use report_data::summary::ViolationSummary;
use serde::{Deserialize, Serialize};

/// Document written by [`write_summary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Directory the scan reports were read from.
    pub input_dir: PathBuf,
    /// Number of reports that were read successfully.
    pub files_processed: usize,
    #[serde(flatten)]
    pub violations: ViolationSummary,
}

impl SummaryReport {
    pub fn new(input_dir: &Path, files_processed: usize, violations: ViolationSummary) -> Self {
        Self {
            generated_at: Utc::now(),
            input_dir: input_dir.to_path_buf(),
            files_processed,
            violations,
        }
    }
}

/// Write `report` to `path` as pretty-printed JSON, creating parent
/// directories if needed.
pub fn write_summary(report: &SummaryReport, path: &Path) -> Result<()> {
    let write_error = |source: std::io::Error| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_summary_round_trips_counts() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("reports").join("summary.json");

        let mut violations = ViolationSummary {
            total: 3,
            excluded: 2,
            unique_rules: 2,
            ..Default::default()
        };
        violations.by_impact.insert("serious".into(), 2);
        violations.by_impact.insert("critical".into(), 1);
        violations.by_wcag_level.insert("AA".into(), 3);

        let report = SummaryReport::new(Path::new("./results"), 4, violations);
        write_summary(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["files_processed"], 4);
        assert_eq!(value["total"], 3);
        assert_eq!(value["excluded"], 2);
        assert_eq!(value["unique_rules"], 2);
        assert_eq!(value["by_impact"]["serious"], 2);
        assert_eq!(value["by_wcag_level"]["AA"], 3);
        assert!(value["generated_at"].is_string());

        let parsed: SummaryReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.violations, report.violations);
    }
}
