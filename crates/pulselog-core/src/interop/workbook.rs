//! Spreadsheet workbook (xlsx) reading and writing.
//!
//! Reads the first worksheet of any workbook `calamine` understands and
//! writes single-sheet xlsx files with auto-sized columns.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use rust_xlsxwriter::{Workbook, XlsxError};

use super::{InteropError, InteropResult, Sheet, SheetReader, SheetWriter};

/// Excel's limit on worksheet name length.
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Date-time cells render in the device export's own `M/D/YY H:mm` form.
const DATETIME_CELL_FORMAT: &str = "%-m/%-d/%y %-H:%M";

/// xlsx workbook format.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxFormat;

impl XlsxFormat {
    /// Encode a sheet as xlsx bytes.
    pub fn to_bytes(&self, sheet: &Sheet) -> InteropResult<Vec<u8>> {
        build_workbook(sheet)?.save_to_buffer().map_err(write_error)
    }

    /// Decode the first worksheet of in-memory workbook bytes.
    pub fn from_bytes(&self, bytes: &[u8]) -> InteropResult<Sheet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(read_error)?;
        first_sheet(&mut workbook)
    }
}

impl SheetWriter for XlsxFormat {
    fn write_sheet(&self, sheet: &Sheet, path: &Path) -> InteropResult<()> {
        build_workbook(sheet)?.save(path).map_err(write_error)?;
        tracing::info!(path = %path.display(), rows = sheet.rows.len(), "Exported sheet as xlsx");
        Ok(())
    }
}

impl SheetReader for XlsxFormat {
    fn read_sheet(&self, path: &Path) -> InteropResult<Sheet> {
        let mut workbook = open_workbook_auto(path).map_err(read_error)?;
        first_sheet(&mut workbook)
    }
}

fn build_workbook(sheet: &Sheet) -> InteropResult<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(worksheet_name(&sheet.name))
        .map_err(write_error)?;

    for (row_index, row) in std::iter::once(&sheet.headers).chain(sheet.rows.iter()).enumerate() {
        let row_num = u32::try_from(row_index)
            .map_err(|_| InteropError::WorkbookWrite(format!("too many rows: {}", row_index)))?;
        for (col_index, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let col_num = column_number(col_index)?;
            match exact_number(cell) {
                Some(number) if row_index > 0 => worksheet.write_number(row_num, col_num, number),
                _ => worksheet.write_string(row_num, col_num, cell),
            }
            .map_err(write_error)?;
        }
    }

    for (col_index, width) in sheet.column_widths().into_iter().enumerate() {
        worksheet
            .set_column_width(column_number(col_index)?, width as f64)
            .map_err(write_error)?;
    }

    Ok(workbook)
}

/// A cell written as a number only if reading it back yields the same text.
fn exact_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && n.to_string() == cell)
}

fn column_number(index: usize) -> InteropResult<u16> {
    u16::try_from(index).map_err(|_| InteropError::WorkbookWrite(format!("too many columns: {}", index)))
}

/// Worksheet names are at most 31 characters and exclude `[]:*?/\`.
fn worksheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    if cleaned.trim().is_empty() {
        Sheet::DEFAULT_NAME.to_string()
    } else {
        cleaned
    }
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> InteropResult<Sheet> {
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| InteropError::WorkbookRead("workbook has no sheets".into()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InteropError::WorkbookRead("workbook has no sheets".into()))?
        .map_err(read_error)?;

    let sheet = sheet_from_range(name, &range)?;
    tracing::debug!(sheet = %sheet.name, rows = sheet.rows.len(), "Read workbook sheet");
    Ok(sheet)
}

/// Header is the first non-blank row; column indexes stay absolute.
fn sheet_from_range(name: String, range: &Range<Data>) -> InteropResult<Sheet> {
    let offset = range.start().map_or(0, |(_, col)| col as usize);

    let mut rows = range
        .rows()
        .map(|cells| {
            let mut row = vec![String::new(); offset];
            row.extend(cells.iter().map(cell_text));
            row
        })
        .filter(|row| row.iter().any(|cell| !cell.is_empty()));

    let headers = rows
        .next()
        .ok_or_else(|| InteropError::Parse("sheet has no header row".into()))?;
    Ok(Sheet {
        name,
        headers,
        rows: rows.collect(),
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(datetime) => match datetime.as_datetime() {
            Some(value) => value.format(DATETIME_CELL_FORMAT).to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

fn read_error(e: calamine::Error) -> InteropError {
    InteropError::WorkbookRead(e.to_string())
}

fn write_error(e: XlsxError) -> InteropError {
    InteropError::WorkbookWrite(e.to_string())
}
