//! Combined multi-sheet workbook.
//!
//! Every input report becomes one worksheet. Its sections are stacked top to
//! bottom: a title row carrying the section name, the section's rows, then a
//! single empty spacer row. The first row of every section is the table's
//! column header; the whole row is rendered bold on a grey fill.

use std::collections::BTreeMap;
use std::path::Path;

use report_core::error::{ReportError, Result};
use report_core::models::Document;
use report_core::sheet_name::SheetNamer;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

/// Fill colour of section header rows.
pub const HEADER_FILL: u32 = 0xD9D9D9;

/// Column widths are clamped to this range (in characters).
pub const MIN_COLUMN_WIDTH: usize = 8;
pub const MAX_COLUMN_WIDTH: usize = 60;

/// What [`CombinedWorkbook::save`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookOutcome {
    /// Workbook written with this many sheets.
    Written { sheets: usize },
    /// Nothing was added, so no file was created.
    Empty,
}

// ── CombinedWorkbook ──────────────────────────────────────────────────────────

/// Builder for the combined workbook. Add documents in order, then save.
pub struct CombinedWorkbook {
    workbook: Workbook,
    namer: SheetNamer,
    title_format: Format,
    header_format: Format,
    sheet_names: Vec<String>,
}

impl CombinedWorkbook {
    /// `strip_prefix` is removed from file names before they become sheet
    /// names.
    pub fn new(strip_prefix: &str) -> Self {
        Self {
            workbook: Workbook::new(),
            namer: SheetNamer::new(strip_prefix),
            title_format: Format::new().set_bold(),
            header_format: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(HEADER_FILL)),
            sheet_names: Vec::new(),
        }
    }

    /// Write `doc` to a new worksheet and return the sheet name used.
    pub fn add_document(&mut self, doc: &Document) -> Result<String> {
        let sheet_name = self.namer.name_for_file(&doc.file_name());

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet_name).map_err(workbook_error)?;
        // The sheet stays in the workbook even if writing its rows fails.
        self.sheet_names.push(sheet_name.clone());
        write_sections(worksheet, doc, &self.title_format, &self.header_format)?;

        debug!(
            "Sheet {}: {} sections, {} rows from {}",
            sheet_name,
            doc.sections.len(),
            doc.row_count(),
            doc.source.display()
        );
        Ok(sheet_name)
    }

    /// Names of the sheets added so far, in order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Save the workbook to `path`. An empty workbook is not written.
    pub fn save(mut self, path: &Path) -> Result<WorkbookOutcome> {
        if self.sheet_names.is_empty() {
            return Ok(WorkbookOutcome::Empty);
        }
        self.workbook.save(path).map_err(workbook_error)?;
        Ok(WorkbookOutcome::Written {
            sheets: self.sheet_names.len(),
        })
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

fn write_sections(
    worksheet: &mut Worksheet,
    doc: &Document,
    title_format: &Format,
    header_format: &Format,
) -> Result<()> {
    let mut current_row = 0usize;
    let mut widths: BTreeMap<u16, usize> = BTreeMap::new();

    for section in &doc.sections {
        let title_row = to_row(current_row)?;
        if let Some(name) = section.name.as_deref() {
            worksheet
                .write_string_with_format(title_row, 0, name, title_format)
                .map_err(workbook_error)?;
        }
        current_row += 1;

        for (offset, row) in section.rows.iter().enumerate() {
            let row_num = to_row(current_row)?;
            if offset == 0 {
                // Shade the whole header row, gaps included.
                worksheet
                    .set_row_format(row_num, header_format)
                    .map_err(workbook_error)?;
            }
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let col = to_col(col)?;
                let written = if offset == 0 {
                    worksheet.write_string_with_format(row_num, col, value, header_format)
                } else {
                    worksheet.write_string(row_num, col, value)
                };
                written.map_err(workbook_error)?;

                let width = widths.entry(col).or_insert(0);
                *width = (*width).max(display_width(value));
            }
            current_row += 1;
        }

        // Spacer between sections.
        current_row += 1;
    }

    for (col, width) in widths {
        let width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet
            .set_column_width(col, width as f64)
            .map_err(workbook_error)?;
    }

    Ok(())
}

/// Widest line of `value`, in terminal columns.
fn display_width(value: &str) -> usize {
    value
        .lines()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
}

fn to_row(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| ReportError::Workbook(format!("row {row} out of range")))
}

fn to_col(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| ReportError::Workbook(format!("column {col} out of range")))
}

fn workbook_error(err: XlsxError) -> ReportError {
    ReportError::Workbook(err.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
