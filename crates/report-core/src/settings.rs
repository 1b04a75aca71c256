use clap::Parser;
use std::path::PathBuf;

use crate::error::{ReportError, Result};

// ── Defaults ───────────────────────────────────────────────────────────────────

/// Directory scanned for per-page reports.
pub const DEFAULT_INPUT_DIR: &str = "./results";

/// Combined workbook written in `workbook` and `all` modes.
pub const DEFAULT_WORKBOOK_PATH: &str = "combined_accessibility_results.xlsx";

/// Flat violations CSV written in `violations` and `all` modes.
pub const DEFAULT_VIOLATIONS_PATH: &str = "all_violations_except_nested_interactive.csv";

/// Common prefix of the scanner's output file names.
pub const DEFAULT_STRIP_PREFIX: &str = "accessibility-results-field-sandbox-atlan-com-";

/// Single-field line that opens the violations table.
pub const DEFAULT_SECTION_MARKER: &str = "Test Results";

/// Column holding the axe rule identifier.
pub const DEFAULT_RULE_COLUMN: &str = "Rule ID";

/// Rule left out of the violations CSV by default.
pub const DEFAULT_EXCLUDED_RULE: &str = "nested-interactive";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Combine per-page accessibility scan reports into a workbook and a
/// violations CSV
#[derive(Parser, Debug, Clone)]
#[command(
    name = "axe-combine",
    about = "Combine per-page accessibility scan reports into a workbook and a violations CSV",
    version
)]
pub struct Settings {
    /// Directory containing the per-page CSV reports
    #[arg(long, default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Which outputs to produce
    #[arg(long, default_value = "all", value_parser = ["all", "workbook", "violations"])]
    pub mode: String,

    /// Path of the combined workbook
    #[arg(long, default_value = DEFAULT_WORKBOOK_PATH)]
    pub workbook: PathBuf,

    /// Path of the flat violations CSV
    #[arg(long, default_value = DEFAULT_VIOLATIONS_PATH)]
    pub violations: PathBuf,

    /// Also write a JSON summary of the violations to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Prefix removed from file names before they become sheet names
    #[arg(long, default_value = DEFAULT_STRIP_PREFIX)]
    pub strip_prefix: String,

    /// Section title that introduces the violations table
    #[arg(long, default_value = DEFAULT_SECTION_MARKER)]
    pub section_marker: String,

    /// Header of the column holding the rule identifier
    #[arg(long, default_value = DEFAULT_RULE_COLUMN)]
    pub rule_column: String,

    /// Rule identifier to leave out of the violations CSV (repeatable)
    #[arg(long = "exclude-rule", default_value = DEFAULT_EXCLUDED_RULE)]
    pub exclude_rules: Vec<String>,

    /// Field delimiter of the input files
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Apply the `--debug` flag.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Reject values clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(ReportError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ReportError::Config(format!(
                "delimiter must not be a quote or line terminator, got {:?}",
                self.delimiter
            )));
        }
        if self.rule_column.is_empty() {
            return Err(ReportError::Config("rule column must not be empty".into()));
        }
        Ok(())
    }

    /// Delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // `validate` guarantees ASCII; anything else degrades to a comma.
        u8::try_from(self.delimiter).unwrap_or(b',')
    }

    pub fn writes_workbook(&self) -> bool {
        matches!(self.mode.as_str(), "all" | "workbook")
    }

    pub fn writes_violations(&self) -> bool {
        matches!(self.mode.as_str(), "all" | "violations")
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["axe-combine"]);

        assert_eq!(settings.input_dir, PathBuf::from("./results"));
        assert_eq!(settings.mode, "all");
        assert_eq!(
            settings.workbook,
            PathBuf::from("combined_accessibility_results.xlsx")
        );
        assert_eq!(
            settings.violations,
            PathBuf::from("all_violations_except_nested_interactive.csv")
        );
        assert!(settings.summary.is_none());
        assert_eq!(settings.strip_prefix, DEFAULT_STRIP_PREFIX);
        assert_eq!(settings.section_marker, "Test Results");
        assert_eq!(settings.rule_column, "Rule ID");
        assert_eq!(settings.exclude_rules, vec!["nested-interactive".to_string()]);
        assert_eq!(settings.delimiter, ',');
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_repeated_exclude_rule() {
        let settings = Settings::parse_from([
            "axe-combine",
            "--exclude-rule",
            "region",
            "--exclude-rule",
            "landmark-one-main",
        ]);
        assert_eq!(
            settings.exclude_rules,
            vec!["region".to_string(), "landmark-one-main".to_string()]
        );
    }

    #[test]
    fn test_settings_cli_mode() {
        let settings = Settings::parse_from(["axe-combine", "--mode", "violations"]);
        assert!(settings.writes_violations());
        assert!(!settings.writes_workbook());

        let settings = Settings::parse_from(["axe-combine", "--mode", "workbook"]);
        assert!(settings.writes_workbook());
        assert!(!settings.writes_violations());

        let settings = Settings::parse_from(["axe-combine"]);
        assert!(settings.writes_workbook());
        assert!(settings.writes_violations());
    }

    #[test]
    fn test_settings_cli_rejects_unknown_mode() {
        let result = Settings::try_parse_from(["axe-combine", "--mode", "pdf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_paths() {
        let settings = Settings::parse_from([
            "axe-combine",
            "--input-dir",
            "/tmp/scans",
            "--summary",
            "/tmp/summary.json",
            "--log-file",
            "/tmp/combine.log",
        ]);
        assert_eq!(settings.input_dir, PathBuf::from("/tmp/scans"));
        assert_eq!(settings.summary, Some(PathBuf::from("/tmp/summary.json")));
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/combine.log")));
    }

    #[test]
    fn test_load_debug_overrides_log_level() {
        let settings = Settings::load_from_args(["axe-combine", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_validate_accepts_tab_delimiter() {
        let settings = Settings::parse_from(["axe-combine", "--delimiter", "\t"]);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.delimiter_byte(), b'\t');
    }

    #[test]
    fn test_validate_rejects_non_ascii_delimiter() {
        let settings = Settings::parse_from(["axe-combine", "--delimiter", "§"]);
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_quote_and_line_terminators() {
        for delimiter in ["\"", "\n", "\r"] {
            let settings = Settings::parse_from(["axe-combine", "--delimiter", delimiter]);
            assert!(
                matches!(settings.validate(), Err(ReportError::Config(_))),
                "{delimiter:?} accepted"
            );
        }
    }

    #[test]
    fn test_validate_rejects_empty_rule_column() {
        let settings = Settings::parse_from(["axe-combine", "--rule-column", ""]);
        assert!(matches!(settings.validate(), Err(ReportError::Config(_))));
    }
}
