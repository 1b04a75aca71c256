//! Data ingestion layer for the accessibility report combiner.
//!
//! Responsible for discovering scan reports, reading their rows, splitting
//! them into sections, and extracting and summarising rule violations.

pub mod reader;
pub mod sections;
pub mod summary;
pub mod violations;

pub use report_core as core;
