//! Shared foundations for the accessibility report combiner.
//!
//! Holds the row/section data model, the crate-wide error type, command-line
//! settings and the worksheet naming rules used by the output layer.

pub mod error;
pub mod models;
pub mod settings;
pub mod sheet_name;
