//! Tabular workbook codec.
//!
//! Decodes uploaded workbooks into loosely-typed rows and serializes query
//! results back into downloadable workbooks. Column headers carry two naming
//! conventions at once: the Indonesian display label shown to users and the
//! machine-style snake_case key; the decoder accepts either.

mod decode;
mod encode;

pub use decode::*;
pub use encode::*;

use chrono::NaiveDate;
use thiserror::Error;

/// Codec errors. A decode failure aborts the whole upload; no partial
/// parse is ever used.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("workbook has no header row")]
    Empty,

    #[error("malformed workbook: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SheetResult<T> = Result<T, SheetError>;

/// Column layout entry: display header, machine key, minimum display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub key: &'static str,
    pub width: usize,
}

/// Placeholder rendered for missing or empty cells on export.
pub const EMPTY_CELL: &str = "-";

/// Download file name: `<stem>_<ISO-date>.csv`. Callers pass the export
/// moment, not any data date.
pub fn export_file_name(stem: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", stem, date)
}
