use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sojourn_core::{parse_date, Trip};

use crate::util::{normalize_header, sanitize_field};

/// One row of a trips table. Dates are `None` when the cell was blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTrip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    #[serde(with = "blank_date")]
    pub out_date: Option<NaiveDate>,
    #[serde(with = "blank_date")]
    pub in_date: Option<NaiveDate>,
    pub out_route: String,
    pub in_route: String,
}

impl ParsedTrip {
    /// Convert to a [`Trip`]; day counts are only filled in when both dates are present.
    pub fn to_trip(&self, id: u32) -> Trip {
        match (self.out_date, self.in_date) {
            (Some(out_date), Some(in_date)) => Trip::complete(
                id,
                out_date,
                in_date,
                self.out_route.clone(),
                self.in_route.clone(),
            ),
            (out_date, in_date) => Trip {
                id,
                out_date,
                in_date,
                out_route: self.out_route.clone(),
                in_route: self.in_route.clone(),
                calendar_days: None,
                full_days: None,
            },
        }
    }
}

/// Serialises a missing date as `""` rather than `null`.
mod blank_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.collect_str(d),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    pub trips: Vec<ParsedTrip>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ParseResult {
    pub fn from_parts(trips: Vec<ParsedTrip>, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: errors.is_empty(),
            trips,
            errors,
            warnings,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::from_parts(Vec::new(), vec![message.into()], Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Num,
    OutDate,
    InDate,
    OutRoute,
    InRoute,
    /// Computed on export, never read back.
    Derived,
    Other(String),
}

impl Column {
    pub fn from_header(header: &str) -> Self {
        let normalized = normalize_header(header);
        match normalized.as_str() {
            "#" | "num" | "number" => Column::Num,
            "date out" | "dateout" | "departure date" | "out date" => Column::OutDate,
            "date in" | "datein" | "return date" | "in date" => Column::InDate,
            "departure" | "departure route" | "out route" => Column::OutRoute,
            "return" | "return route" | "in route" => Column::InRoute,
            "calendar days" | "full days outside uk" | "full days" => Column::Derived,
            _ => Column::Other(header.to_string()),
        }
    }
}

/// Where the table came from; only changes the wording of top-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableSource {
    Csv,
    Excel,
}

impl TableSource {
    fn no_rows_message(self) -> &'static str {
        match self {
            TableSource::Csv => "No data rows found in CSV",
            TableSource::Excel => "No data rows found in Excel file",
        }
    }

    fn missing_columns_message(self) -> &'static str {
        match self {
            TableSource::Csv => "CSV must contain \"Date Out\" and \"Date In\" columns",
            TableSource::Excel => "Excel file must contain \"Date Out\" and \"Date In\" columns",
        }
    }
}

struct ColumnIndex {
    num: Option<usize>,
    out_date: usize,
    in_date: usize,
    out_route: Option<usize>,
    in_route: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &[String]) -> Option<Self> {
        let columns: Vec<Column> = headers.iter().map(|h| Column::from_header(h)).collect();
        let find = |wanted: Column| columns.iter().position(|c| *c == wanted);
        Some(Self {
            num: find(Column::Num),
            out_date: find(Column::OutDate)?,
            in_date: find(Column::InDate)?,
            out_route: find(Column::OutRoute),
            in_route: find(Column::InRoute),
        })
    }
}

/// The top-level failure for a header row without both date columns.
pub(crate) fn check_required_columns(source: TableSource, headers: &[String]) -> Option<ParseResult> {
    match ColumnIndex::from_headers(headers) {
        Some(_) => None,
        None => Some(ParseResult::failure(source.missing_columns_message())),
    }
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

/// Validate data rows against the header. Rows are numbered as a user sees
/// them in a spreadsheet: the header is row 1, the first data row is row 2.
pub(crate) fn parse_rows(source: TableSource, headers: &[String], rows: &[Vec<String>]) -> ParseResult {
    if rows.is_empty() {
        return ParseResult::failure(source.no_rows_message());
    }
    let Some(index) = ColumnIndex::from_headers(headers) else {
        return ParseResult::failure(source.missing_columns_message());
    };

    let mut trips = Vec::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let row_num = i + 2;
        let out_raw = cell(row, Some(index.out_date)).trim();
        let in_raw = cell(row, Some(index.in_date)).trim();

        if out_raw.is_empty() && in_raw.is_empty() {
            warnings.push(format!("Row {row_num}: Both dates are empty, skipping"));
            continue;
        }

        let out_date = parse_optional_date(out_raw);
        let in_date = parse_optional_date(in_raw);
        if out_date.is_err() {
            errors.push(format!(
                "Row {row_num}: Invalid departure date format \"{out_raw}\". Use DD/MM/YYYY or YYYY-MM-DD"
            ));
        }
        if in_date.is_err() {
            errors.push(format!(
                "Row {row_num}: Invalid return date format \"{in_raw}\". Use DD/MM/YYYY or YYYY-MM-DD"
            ));
        }
        let (Ok(out_date), Ok(in_date)) = (out_date, in_date) else {
            tracing::warn!(row = row_num, "Dropping row with invalid date");
            continue;
        };

        if let (Some(departed), Some(returned)) = (out_date, in_date) {
            if departed > returned {
                errors.push(format!("Row {row_num}: Departure date is after return date"));
                tracing::warn!(row = row_num, "Dropping row with inverted dates");
                continue;
            }
        }

        let num = Some(cell(row, index.num).trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        trips.push(ParsedTrip {
            num,
            out_date,
            in_date,
            out_route: sanitize_field(cell(row, index.out_route)),
            in_route: sanitize_field(cell(row, index.in_route)),
        });
    }

    tracing::info!(
        trips = trips.len(),
        errors = errors.len(),
        warnings = warnings.len(),
        "Parsed trips table"
    );

    ParseResult::from_parts(trips, errors, warnings)
}

/// `Ok(None)` for a blank cell, `Err(())` for text that is not a date.
fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_date(raw).map(Some).ok_or(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── header mapping ────────────────────────────────────────────────────────

    #[test]
    fn header_aliases() {
        assert_eq!(Column::from_header("#"), Column::Num);
        assert_eq!(Column::from_header("Number"), Column::Num);
        assert_eq!(Column::from_header("Date Out"), Column::OutDate);
        assert_eq!(Column::from_header("DATEOUT"), Column::OutDate);
        assert_eq!(Column::from_header(" departure  date "), Column::OutDate);
        assert_eq!(Column::from_header("Return Date"), Column::InDate);
        assert_eq!(Column::from_header("in date"), Column::InDate);
        assert_eq!(Column::from_header("Departure"), Column::OutRoute);
        assert_eq!(Column::from_header("out route"), Column::OutRoute);
        assert_eq!(Column::from_header("Return"), Column::InRoute);
        assert_eq!(Column::from_header("In Route"), Column::InRoute);
    }

    #[test]
    fn derived_columns_are_ignored() {
        assert_eq!(Column::from_header("Calendar Days"), Column::Derived);
        assert_eq!(Column::from_header("Full Days Outside UK"), Column::Derived);
        assert_eq!(Column::from_header("full days"), Column::Derived);
    }

    #[test]
    fn unknown_header_passes_through() {
        assert_eq!(Column::from_header("Notes"), Column::Other("Notes".to_string()));
    }

    // ── parse_rows ────────────────────────────────────────────────────────────

    #[test]
    fn one_sided_rows_are_kept() {
        let headers = strings(&["Date Out", "Date In"]);
        let rows = vec![strings(&["15/01/2024", ""]), strings(&["", "20/01/2024"])];
        let result = parse_rows(TableSource::Csv, &headers, &rows);
        assert!(result.success);
        assert_eq!(result.trips.len(), 2);
        assert_eq!(result.trips[0].in_date, None);
        assert_eq!(result.trips[1].out_date, None);
        assert_eq!(result.trips[1].in_date, Some(date(2024, 1, 20)));
    }

    #[test]
    fn inverted_dates_error() {
        let headers = strings(&["Date Out", "Date In"]);
        let rows = vec![strings(&["20/01/2024", "15/01/2024"])];
        let result = parse_rows(TableSource::Csv, &headers, &rows);
        assert!(!result.success);
        assert!(result.trips.is_empty());
        assert_eq!(result.errors, vec!["Row 2: Departure date is after return date"]);
    }

    #[test]
    fn both_invalid_dates_reported() {
        let headers = strings(&["Date Out", "Date In"]);
        let rows = vec![strings(&["nope", "2024/01/20"])];
        let result = parse_rows(TableSource::Csv, &headers, &rows);
        assert_eq!(
            result.errors,
            vec![
                "Row 2: Invalid departure date format \"nope\". Use DD/MM/YYYY or YYYY-MM-DD",
                "Row 2: Invalid return date format \"2024/01/20\". Use DD/MM/YYYY or YYYY-MM-DD",
            ]
        );
    }

    #[test]
    fn short_rows_read_as_blank() {
        let headers = strings(&["Date Out", "Date In", "Departure", "Return"]);
        let rows = vec![strings(&["15/01/2024"])];
        let result = parse_rows(TableSource::Csv, &headers, &rows);
        assert!(result.success);
        assert_eq!(result.trips[0].out_route, "");
        assert_eq!(result.trips[0].in_date, None);
    }

    #[test]
    fn routes_are_sanitized() {
        let headers = strings(&["Date Out", "Date In", "Departure", "Return"]);
        let rows = vec![strings(&["15/01/2024", "20/01/2024", "=HYPERLINK(\"x\")", " @Paris "])];
        let result = parse_rows(TableSource::Csv, &headers, &rows);
        assert_eq!(result.trips[0].out_route, "HYPERLINK(\"x\")");
        assert_eq!(result.trips[0].in_route, "Paris");
    }

    #[test]
    fn missing_columns_excel_wording() {
        let headers = strings(&["Departure", "Return"]);
        let rows = vec![strings(&["London", "Paris"])];
        let result = parse_rows(TableSource::Excel, &headers, &rows);
        assert!(!result.success);
        assert!(result.errors[0].starts_with("Excel file must contain"));
    }

    // ── ParsedTrip ────────────────────────────────────────────────────────────

    #[test]
    fn parsed_trip_serializes_blank_dates_as_empty_strings() {
        let trip = ParsedTrip {
            num: None,
            out_date: Some(date(2024, 1, 15)),
            in_date: None,
            out_route: "London".to_string(),
            in_route: String::new(),
        };
        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["outDate"], "2024-01-15");
        assert_eq!(json["inDate"], "");
        assert!(json.get("num").is_none());

        let back: ParsedTrip = serde_json::from_value(json).unwrap();
        assert_eq!(back, trip);
    }

    #[test]
    fn to_trip_computes_days_when_complete() {
        let trip = ParsedTrip {
            num: Some("1".to_string()),
            out_date: Some(date(2024, 1, 15)),
            in_date: Some(date(2024, 1, 20)),
            out_route: "London".to_string(),
            in_route: "Paris".to_string(),
        };
        let t = trip.to_trip(7);
        assert_eq!(t.id, 7);
        assert_eq!(t.calendar_days, Some(5));
        assert_eq!(t.full_days, Some(4));

        let open = ParsedTrip { in_date: None, in_route: String::new(), ..trip };
        let t = open.to_trip(8);
        assert_eq!(t.full_days, None);
        assert_eq!(t.in_route, "");
    }
}
