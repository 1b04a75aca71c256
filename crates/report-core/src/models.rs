use std::path::PathBuf;

/// One CSV record, in field order. A blank physical line is an empty row.
pub type Row = Vec<String>;

/// Returns `true` when the row carries no data: no fields at all, or every
/// field empty.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|field| field.is_empty())
}

/// A contiguous group of data rows, optionally introduced by a one-field
/// title line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    /// Title taken from the single-field header line, if any.
    pub name: Option<String>,
    /// Data rows in file order.
    pub rows: Vec<Row>,
}

impl Section {
    pub fn new(name: Option<String>, rows: Vec<Row>) -> Self {
        Self { name, rows }
    }
}

/// All sections of a single input file, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File the sections were read from.
    pub source: PathBuf,
    /// Sections in file order.
    pub sections: Vec<Section>,
}

impl Document {
    /// File name of the source, or the full path when it has none.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// Total number of data rows across all sections.
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}
