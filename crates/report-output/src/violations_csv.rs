//! Flat CSV export of the combined violations table.

use std::path::Path;

use csv::{Terminator, WriterBuilder};
use report_core::error::{ReportError, Result};
use report_data::violations::ViolationTable;

/// What [`write_violations`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationsOutcome {
    /// File written with this many violation rows (header excluded).
    Written { rows: usize },
    /// No header or no rows were found; nothing was written.
    Empty,
}

/// Write the header followed by every violation row to `path`.
///
/// Rows from different reports may differ in width, so the writer is
/// flexible. Lines end in `\r\n`.
pub fn write_violations(table: &ViolationTable, path: &Path) -> Result<ViolationsOutcome> {
    let Some(header) = table.header.as_ref() else {
        return Ok(ViolationsOutcome::Empty);
    };
    if table.rows.is_empty() {
        return Ok(ViolationsOutcome::Empty);
    }

    let csv_error = |source: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_path(path)
        .map_err(csv_error)?;

    writer.write_record(header).map_err(csv_error)?;
    for row in &table.rows {
        writer.write_record(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ViolationsOutcome::Written {
        rows: table.rows.len(),
    })
}
