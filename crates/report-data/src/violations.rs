//! Violation extraction from scan reports.
//!
//! Each report carries a violations table introduced by a one-field title
//! line (`Test Results`). The first row after the title that mentions the
//! rule column (`Rule ID`) is the table header; every later row of the same
//! width is a violation. Rows for excluded rules are dropped. Once the title
//! has been seen the scan stays in table mode until the end of the file.

use report_core::models::{is_blank_row, Row};
use report_core::settings::{DEFAULT_EXCLUDED_RULE, DEFAULT_RULE_COLUMN, DEFAULT_SECTION_MARKER};
use tracing::debug;

// ── ExtractionRules ───────────────────────────────────────────────────────────

/// What to look for and what to drop while extracting violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRules {
    /// Title line that opens the violations table.
    pub section_marker: String,
    /// Header cell naming the rule identifier column.
    pub rule_column: String,
    /// Rule identifiers whose rows are discarded.
    pub excluded_rules: Vec<String>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            section_marker: DEFAULT_SECTION_MARKER.to_string(),
            rule_column: DEFAULT_RULE_COLUMN.to_string(),
            excluded_rules: vec![DEFAULT_EXCLUDED_RULE.to_string()],
        }
    }
}

impl ExtractionRules {
    fn is_excluded(&self, rule_id: &str) -> bool {
        self.excluded_rules.iter().any(|r| r == rule_id)
    }
}

// ── FileViolations ────────────────────────────────────────────────────────────

/// Violations found in a single report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileViolations {
    /// Table header, when the report had one.
    pub header: Option<Row>,
    /// Kept violation rows, in file order.
    pub rows: Vec<Row>,
    /// Rows dropped because their rule was excluded.
    pub excluded: usize,
}

/// Scan the rows of one report and collect its violations.
pub fn extract_violations(rows: &[Row], rules: &ExtractionRules) -> FileViolations {
    let mut found = FileViolations::default();
    let mut in_table = false;
    let mut rule_index: Option<usize> = None;

    for row in rows {
        if is_blank_row(row) {
            continue;
        }

        if row.len() == 1 && row[0] == rules.section_marker {
            in_table = true;
            continue;
        }

        if !in_table {
            continue;
        }

        let Some(index) = rule_index else {
            if let Some(pos) = row.iter().position(|f| *f == rules.rule_column) {
                rule_index = Some(pos);
                found.header = Some(row.clone());
            }
            continue;
        };

        let width = found.header.as_ref().map(Vec::len).unwrap_or(0);
        if row.len() != width {
            continue;
        }

        if rules.is_excluded(&row[index]) {
            found.excluded += 1;
        } else {
            found.rows.push(row.clone());
        }
    }

    debug!(
        "Extracted {} violations ({} excluded)",
        found.rows.len(),
        found.excluded
    );
    found
}

// ── ViolationTable ────────────────────────────────────────────────────────────

/// Violations accumulated across every processed report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationTable {
    /// Header taken from the first report that had one.
    pub header: Option<Row>,
    /// All kept violation rows, in file order.
    pub rows: Vec<Row>,
    /// Total rows dropped because their rule was excluded.
    pub excluded: usize,
}

impl ViolationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one report's violations into the table.
    pub fn absorb(&mut self, file: FileViolations) {
        if self.header.is_none() {
            self.header = file.header;
        }
        self.rows.extend(file.rows);
        self.excluded += file.excluded;
    }

    /// `true` when there is nothing worth writing out.
    pub fn is_empty(&self) -> bool {
        self.header.is_none() || self.rows.is_empty()
    }

    /// Index of the header cell equal to `column`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.as_ref()?.iter().position(|h| h == column)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
