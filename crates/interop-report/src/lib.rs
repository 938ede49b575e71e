//! Bookkeeping for interoperability results.
//!
//! A [`Matrix`] records one [`Outcome`] per (row, column) pair: rows are test
//! names or issuers, columns are implementations. A [`Report`] groups the
//! matrices of a run and is rendered to JSON and Markdown.

mod errors;
mod matrix;
mod render;

pub use errors::ReportError;
pub use matrix::{Matrix, Outcome, Report, Row, Summary};
pub use render::{render_markdown, write_report};
