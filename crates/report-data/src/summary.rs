//! Roll-up statistics over the combined violations table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::violations::ViolationTable;

/// Header of the severity column written by the scanner.
pub const IMPACT_COLUMN: &str = "Impact";

/// Header of the conformance-level column written by the scanner.
pub const WCAG_LEVEL_COLUMN: &str = "WCAG Level";

/// Bucket used when a column is missing or a cell is empty.
pub const UNKNOWN: &str = "unknown";

/// Counts of violation rows by impact and WCAG level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationSummary {
    /// Number of violation rows kept.
    pub total: usize,
    /// Number of rows dropped by the rule exclusion list.
    pub excluded: usize,
    /// Number of distinct rule identifiers among the kept rows.
    pub unique_rules: usize,
    /// Rows per impact value (`critical`, `serious`, …).
    pub by_impact: BTreeMap<String, usize>,
    /// Rows per WCAG level (`A`, `AA`, …).
    pub by_wcag_level: BTreeMap<String, usize>,
}

impl ViolationSummary {
    /// Summarise `table`, reading rule identifiers from `rule_column`.
    pub fn from_table(table: &ViolationTable, rule_column: &str) -> Self {
        let impact_idx = table.column_index(IMPACT_COLUMN);
        let level_idx = table.column_index(WCAG_LEVEL_COLUMN);
        let rule_idx = table.column_index(rule_column);

        let mut summary = ViolationSummary {
            total: table.rows.len(),
            excluded: table.excluded,
            ..Default::default()
        };
        let mut rules: BTreeSet<&str> = BTreeSet::new();

        for row in &table.rows {
            *summary
                .by_impact
                .entry(bucket(row, impact_idx))
                .or_insert(0) += 1;
            *summary
                .by_wcag_level
                .entry(bucket(row, level_idx))
                .or_insert(0) += 1;
            if let Some(rule) = rule_idx.and_then(|i| row.get(i)) {
                rules.insert(rule.as_str());
            }
        }

        summary.unique_rules = rules.len();
        summary
    }
}

fn bucket(row: &[String], index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| UNKNOWN.to_string())
}
