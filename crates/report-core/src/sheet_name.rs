//! Worksheet naming for the combined workbook.
//!
//! Excel limits sheet names to 31 characters, forbids `[ ] : * ? / \`,
//! rejects leading or trailing apostrophes and compares names
//! case-insensitively. [`SheetNamer`] turns input file names into names that
//! satisfy all of those rules and never repeat within one workbook.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Maximum sheet-name length accepted by Excel, in characters.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Name used when sanitising leaves nothing behind.
pub const FALLBACK_SHEET_NAME: &str = "Sheet";

/// Names Excel reserves for itself.
const RESERVED_SHEET_NAMES: &[&str] = &["history"];

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\[\]:*?/\\]").expect("regex is valid"))
}

/// Derive the raw sheet base name from an input file name by removing
/// `prefix` from the front and the `.csv` extension from the end.
pub fn sheet_base_name(file_name: &str, prefix: &str) -> String {
    let without_prefix = if prefix.is_empty() {
        file_name
    } else {
        file_name.strip_prefix(prefix).unwrap_or(file_name)
    };
    without_prefix
        .strip_suffix(".csv")
        .unwrap_or(without_prefix)
        .to_string()
}

/// Make `raw` acceptable to Excel without deduplicating it.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned = invalid_chars().replace_all(raw, "");
    let trimmed = cleaned.trim_matches('\'');
    let truncated: String = trimmed.chars().take(MAX_SHEET_NAME_LEN).collect();
    let truncated = truncated.trim_end_matches('\'');

    if truncated.trim().is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        truncated.to_string()
    }
}

// ── SheetNamer ────────────────────────────────────────────────────────────────

/// Hands out unique, Excel-safe sheet names for one workbook.
#[derive(Debug, Clone)]
pub struct SheetNamer {
    prefix: String,
    taken: HashSet<String>,
}

impl SheetNamer {
    /// `prefix` is stripped from the front of every file name before use.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            taken: RESERVED_SHEET_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Produce the sheet name for an input file name and reserve it.
    pub fn name_for_file(&mut self, file_name: &str) -> String {
        let base = sheet_base_name(file_name, &self.prefix);
        self.claim(&sanitize_sheet_name(&base))
    }

    /// Reserve `name` (already sanitised), appending `_2`, `_3`, … when a
    /// case-insensitive match is already taken.
    pub fn claim(&mut self, name: &str) -> String {
        if self.taken.insert(name.to_lowercase()) {
            return name.to_string();
        }

        let mut counter = 2usize;
        loop {
            let suffix = format!("_{counter}");
            let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let stem: String = name.chars().take(keep).collect();
            let candidate = format!("{stem}{suffix}");
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Number of names handed out so far.
    pub fn len(&self) -> usize {
        self.taken.len() - RESERVED_SHEET_NAMES.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SheetNamer {
    fn default() -> Self {
        Self::new("")
    }
}
