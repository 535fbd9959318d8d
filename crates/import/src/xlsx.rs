use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, DataType, Reader, Xlsx};
use thiserror::Error;

use crate::table::{check_required_columns, parse_rows, ParseResult, TableSource};

/// Worksheet written by the trips export; preferred over the first sheet.
pub const TRAVEL_HISTORY_SHEET: &str = "Travel History";

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("Excel file contains no worksheets")]
    NoWorksheets,
}

/// Header row plus data rows, every cell rendered as text.
struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

pub fn select_sheet(names: &[String]) -> Option<&str> {
    names
        .iter()
        .find(|n| n.as_str() == TRAVEL_HISTORY_SHEET)
        .or_else(|| names.first())
        .map(String::as_str)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn load_sheet(bytes: &[u8]) -> Result<Sheet, WorkbookError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let names = workbook.sheet_names();
    let name = select_sheet(&names)
        .ok_or(WorkbookError::NoWorksheets)?
        .to_string();
    tracing::debug!(sheet = %name, "Reading worksheet");

    let range = workbook.worksheet_range(&name)?;
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

    let headers = rows.next().unwrap_or_default();
    let rows = rows
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .collect();

    Ok(Sheet { headers, rows })
}

/// Parse a trips workbook that is already in memory.
pub fn parse_xlsx_bytes(bytes: &[u8]) -> ParseResult {
    let sheet = match load_sheet(bytes) {
        Ok(sheet) => sheet,
        Err(e) => {
            tracing::warn!(error = %e, "Could not open workbook");
            return ParseResult::failure(format!("Failed to read Excel file: {e}"));
        }
    };

    if let Some(failure) = check_required_columns(TableSource::Excel, &sheet.headers) {
        return failure;
    }

    parse_rows(TableSource::Excel, &sheet.headers, &sheet.rows)
}

/// Read a workbook from disk, then parse it.
pub async fn parse_xlsx_file(path: impl AsRef<Path>) -> ParseResult {
    match tokio::fs::read(path.as_ref()).await {
        Ok(bytes) => parse_xlsx_bytes(&bytes),
        Err(e) => {
            let e = WorkbookError::from(e);
            ParseResult::failure(format!("Failed to read Excel file: {e}"))
        }
    }
}
