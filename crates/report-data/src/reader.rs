//! CSV report discovery and row loading.
//!
//! Scan reports are read whole and parsed with the `csv` crate in flexible
//! mode, so ragged rows and quoted multi-line fields are handled. The `csv`
//! reader silently drops empty lines, but those lines are what separates
//! report sections, so [`read_rows`] recovers them from the reader's byte
//! positions and re-inserts them as zero-field rows.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use report_core::error::{ReportError, Result};
use report_core::models::{Document, Row};
use tracing::{debug, warn};

use crate::sections::split_sections;

const UTF8_BOM: char = '\u{feff}';

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the `.csv` files directly inside `dir`, sorted by path.
///
/// Sub-directories are not searched. A `.csv` entry that cannot be inspected
/// (a dangling symlink, say) is logged and still returned, so the failure
/// surfaces when the file is read.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => (entry.file_type().is_file() && is_csv_name(entry.path()))
                .then(|| entry.into_path()),
            Err(e) => {
                let path = e.path().map(Path::to_path_buf);
                match path {
                    Some(path) if is_csv_name(&path) => {
                        warn!("Cannot inspect {}: {}", path.display(), e);
                        Some(path)
                    }
                    _ => {
                        warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                        None
                    }
                }
            }
        })
        .collect();

    files.sort();
    files
}

/// Read every row of a CSV file, keeping blank lines as empty rows.
pub fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<Row>> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let rows = parse_rows(&text, delimiter).map_err(|source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("File {}: {} rows read", path.display(), rows.len());
    Ok(rows)
}

/// Build a [`Document`] from rows that were already loaded.
pub fn document_from_rows(path: &Path, rows: Vec<Row>) -> Document {
    Document {
        source: path.to_path_buf(),
        sections: split_sections(rows),
    }
}

/// Parse CSV text into rows, keeping blank lines as empty rows.
pub fn parse_rows(text: &str, delimiter: u8) -> std::result::Result<Vec<Row>, csv::Error> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let bytes = text.as_bytes();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);

    let mut rows: Vec<Row> = Vec::new();
    let mut record = StringRecord::new();
    let mut consumed = 0usize;

    while reader.read_record(&mut record)? {
        let end = usize::try_from(reader.position().byte())
            .unwrap_or(bytes.len())
            .min(bytes.len());
        for _ in 0..blank_lines_between(bytes, consumed, end) {
            rows.push(Vec::new());
        }
        rows.push(record.iter().map(str::to_string).collect());
        consumed = end;
    }

    for _ in 0..blank_lines_between(bytes, consumed, bytes.len()) {
        rows.push(Vec::new());
    }

    Ok(rows)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Case-sensitive `.csv` extension check on the file name.
fn is_csv_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(".csv"))
        .unwrap_or(false)
}

/// Count the empty lines at the front of `bytes[start..end]`.
///
/// `start` is where the previous record stopped. The reader may stop before,
/// inside (`\r` of `\r\n`) or after that record's terminator, so whatever is
/// left of the terminator is skipped first.
fn blank_lines_between(bytes: &[u8], start: usize, end: usize) -> usize {
    let mut pos = start;

    if start > 0 {
        match bytes[start - 1] {
            b'\n' => {}
            b'\r' => {
                if bytes.get(pos) == Some(&b'\n') {
                    pos += 1;
                }
            }
            _ => pos += terminator_len(bytes, pos),
        }
    }

    let mut blank = 0;
    while pos < end {
        let len = terminator_len(bytes, pos);
        if len == 0 {
            break;
        }
        blank += 1;
        pos += len;
    }
    blank
}

/// Length of the line terminator starting at `pos`: 2 for `\r\n`, 1 for a
/// lone `\r` or `\n`, 0 otherwise.
fn terminator_len(bytes: &[u8], pos: usize) -> usize {
    match bytes.get(pos) {
        Some(b'\r') if bytes.get(pos + 1) == Some(&b'\n') => 2,
        Some(b'\r') | Some(b'\n') => 1,
        _ => 0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
