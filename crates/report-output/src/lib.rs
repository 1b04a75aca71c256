//! Output layer for the accessibility report combiner.
//!
//! Writes the combined multi-sheet workbook, the flat violations CSV and the
//! optional JSON summary.

pub mod summary_json;
pub mod violations_csv;
pub mod workbook;

pub use report_core as core;
pub use report_data as data;
