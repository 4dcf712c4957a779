//! Spreadsheet interop: tabular export, CSV and xlsx files, and
//! wave-measurement import.
//!
//! Both file formats sit behind [`SheetWriter`] / [`SheetReader`];
//! [`SheetFormat`] picks one from a file extension.

mod csv;
mod import;
mod sheet;
mod workbook;

pub use csv::*;
pub use import::*;
pub use sheet::*;
pub use workbook::*;

use thiserror::Error;

/// Interop errors.
#[derive(Error, Debug)]
pub enum InteropError {
    #[error("No valid rows for subject: {0}")]
    NoValidRows(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Workbook read error: {0}")]
    WorkbookRead(String),

    #[error("Workbook write error: {0}")]
    WorkbookWrite(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InteropResult<T> = Result<T, InteropError>;
