use crate::table::{parse_rows, ParseResult, TableSource};

pub struct CsvImporter;

impl CsvImporter {
    /// Tab when the header line has more tabs than commas, else comma.
    pub fn detect_delimiter(text: &str) -> u8 {
        let first_line = text.lines().next().unwrap_or_default();
        let tabs = first_line.matches('\t').count();
        let commas = first_line.matches(',').count();
        if tabs > commas {
            b'\t'
        } else {
            b','
        }
    }

    pub fn parse_text(text: &str) -> ParseResult {
        let text = text.trim_start_matches('\u{feff}');
        if text.trim().is_empty() {
            return ParseResult::failure("CSV content is empty");
        }

        let delimiter = Self::detect_delimiter(text);
        tracing::debug!(
            delimiter = if delimiter == b'\t' { "tab" } else { "comma" },
            "Detected CSV delimiter"
        );

        match read_table(text, delimiter) {
            Ok((headers, rows)) => parse_rows(TableSource::Csv, &headers, &rows),
            Err(e) => ParseResult::failure(format!("Failed to parse CSV: {e}")),
        }
    }
}

fn read_table(text: &str, delimiter: u8) -> Result<(Vec<String>, Vec<Vec<String>>), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok((headers, rows))
}

/// Parse a comma- or tab-separated trips table.
pub fn parse_csv_text(text: &str) -> ParseResult {
    CsvImporter::parse_text(text)
}

/// Same as [`parse_csv_text`]; pasted spreadsheet cells arrive tab-separated.
pub fn parse_clipboard_text(text: &str) -> ParseResult {
    CsvImporter::parse_text(text)
}
