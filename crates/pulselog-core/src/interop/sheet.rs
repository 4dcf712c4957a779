//! Tabular sheet model and record export.

use std::path::Path;

use super::csv::{encode_csv, parse_csv};
use super::{InteropError, InteropResult, XlsxFormat};
use crate::models::{Field, StoredRecord};

/// Ordered field → column-header mapping for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    columns: Vec<(Field, String)>,
}

impl ColumnMapping {
    /// Mapping from explicit pairs.
    pub fn new(columns: Vec<(Field, String)>) -> Self {
        Self { columns }
    }

    /// The sixteen standard export columns.
    pub fn standard() -> Self {
        Self::from_fields(&[
            Field::CreatedAt,
            Field::Name,
            Field::ResidentNumber,
            Field::Gender,
            Field::Phone,
            Field::Height,
            Field::Weight,
            Field::Bmi,
            Field::Stress,
            Field::WorkIntensity,
            Field::Pulse,
            Field::SystolicBp,
            Field::DiastolicBp,
            Field::Symptoms,
            Field::Medication,
            Field::Memo,
        ])
    }

    /// Every displayed field, waveform metrics included.
    pub fn full() -> Self {
        Self::from_fields(&Field::all())
    }

    /// Fields with their localized labels.
    pub fn from_fields(fields: &[Field]) -> Self {
        Self {
            columns: fields.iter().map(|f| (*f, f.label().to_string())).collect(),
        }
    }

    pub fn columns(&self) -> &[(Field, String)] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|(_, h)| h.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A single sheet: one header row plus data rows of text cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Sheet name used for record exports.
    pub const DEFAULT_NAME: &'static str = "Data";

    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// One row per record, in the order given.
    pub fn from_records(records: &[StoredRecord], mapping: &ColumnMapping) -> Self {
        let mut sheet = Self::new(Self::DEFAULT_NAME, mapping.headers());
        for record in records {
            sheet.rows.push(
                mapping
                    .columns()
                    .iter()
                    .map(|(field, _)| field.text(record))
                    .collect(),
            );
        }
        sheet
    }

    /// First CSV row becomes the header.
    pub fn from_csv(name: impl Into<String>, text: &str) -> InteropResult<Self> {
        let mut rows = parse_csv(text).into_iter();
        let headers = rows
            .next()
            .ok_or_else(|| InteropError::Parse("sheet has no header row".into()))?;
        Ok(Self {
            name: name.into(),
            headers,
            rows: rows.collect(),
        })
    }

    /// Cell text, `None` outside the sheet.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Column widths in characters: the longest of header and cells.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// Quoted CSV with a BOM.
    pub fn to_csv(&self) -> String {
        encode_csv(std::iter::once(&self.headers).chain(self.rows.iter()))
    }

    /// Write as CSV to `path`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> InteropResult<()> {
        std::fs::write(path.as_ref(), self.to_csv())?;
        tracing::info!(
            path = %path.as_ref().display(),
            rows = self.rows.len(),
            "Exported sheet as CSV"
        );
        Ok(())
    }
}

/// Encoder for a sheet file format.
pub trait SheetWriter {
    fn write_sheet(&self, sheet: &Sheet, path: &Path) -> InteropResult<()>;
}

/// Decoder for a sheet file format; returns the first sheet.
pub trait SheetReader {
    fn read_sheet(&self, path: &Path) -> InteropResult<Sheet>;
}

/// CSV file format.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl SheetWriter for CsvFormat {
    fn write_sheet(&self, sheet: &Sheet, path: &Path) -> InteropResult<()> {
        sheet.write_csv(path)
    }
}

impl SheetReader for CsvFormat {
    fn read_sheet(&self, path: &Path) -> InteropResult<Sheet> {
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| Sheet::DEFAULT_NAME.to_string());
        Sheet::from_csv(name, &text)
    }
}

/// File format picked from a path's extension; anything that is not a
/// workbook is treated as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    const WORKBOOK_EXTENSIONS: [&'static str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

    pub fn from_path(path: &Path) -> Self {
        let is_workbook = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                Self::WORKBOOK_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false);
        if is_workbook {
            Self::Workbook
        } else {
            Self::Csv
        }
    }
}

impl SheetWriter for SheetFormat {
    fn write_sheet(&self, sheet: &Sheet, path: &Path) -> InteropResult<()> {
        match self {
            Self::Csv => CsvFormat.write_sheet(sheet, path),
            Self::Workbook => XlsxFormat.write_sheet(sheet, path),
        }
    }
}

impl SheetReader for SheetFormat {
    fn read_sheet(&self, path: &Path) -> InteropResult<Sheet> {
        match self {
            Self::Csv => CsvFormat.read_sheet(path),
            Self::Workbook => XlsxFormat.read_sheet(path),
        }
    }
}
