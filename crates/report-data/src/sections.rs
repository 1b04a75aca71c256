//! Section segmentation for semi-structured scan reports.
//!
//! A report mixes single-field title lines, tabular blocks and blank
//! separator lines. [`SectionSplitter`] walks the rows once, with no
//! lookahead, and groups them:
//!
//! * a blank row closes the current section and forgets its name;
//! * a single-field row closes the current section and names the next one;
//! * every other row is data for the current section.
//!
//! Sections that never received a data row are not emitted.

use report_core::models::{is_blank_row, Row, Section};

// ── SectionSplitter ───────────────────────────────────────────────────────────

/// Incremental row grouper. Feed rows with [`push`](Self::push), then call
/// [`finish`](Self::finish) to collect the sections.
#[derive(Debug, Default)]
pub struct SectionSplitter {
    sections: Vec<Section>,
    current_name: Option<String>,
    current_rows: Vec<Row>,
}

impl SectionSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one row and update the accumulator.
    pub fn push(&mut self, row: Row) {
        if is_blank_row(&row) {
            self.flush();
            self.current_name = None;
        } else if row.len() == 1 {
            self.flush();
            self.current_name = row.into_iter().next();
        } else {
            self.current_rows.push(row);
        }
    }

    /// Emit the trailing section, if any, and return everything in order.
    pub fn finish(mut self) -> Vec<Section> {
        self.flush();
        self.sections
    }

    /// Move accumulated rows into a section under the current name.
    /// The name is left in place; callers decide whether to reset it.
    fn flush(&mut self) {
        if self.current_rows.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.current_rows);
        self.sections
            .push(Section::new(self.current_name.clone(), rows));
    }
}

/// Group `rows` into sections in one pass.
pub fn split_sections<I>(rows: I) -> Vec<Section>
where
    I: IntoIterator<Item = Row>,
{
    let mut splitter = SectionSplitter::new();
    for row in rows {
        splitter.push(row);
    }
    splitter.finish()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
