use sojourn_core::{format_display_date, Trip};
use thiserror::Error;

use crate::util::sanitize_field;

pub const EXPORT_HEADERS: [&str; 7] = [
    "#",
    "Date Out",
    "Date In",
    "Departure",
    "Return",
    "Calendar Days",
    "Full Days Outside UK",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV writer error: {0}")]
    Flush(String),
}

/// Write trips as a spreadsheet-safe CSV that [`crate::parse_csv_text`] can read back.
pub fn export_trips_csv(trips: &[Trip]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for trip in trips {
        let date = |d: Option<chrono::NaiveDate>| d.map(format_display_date).unwrap_or_default();
        let count = |n: Option<i64>| n.map(|n| n.to_string()).unwrap_or_default();
        writer.write_record([
            trip.id.to_string(),
            date(trip.out_date),
            date(trip.in_date),
            sanitize_field(&trip.out_route),
            sanitize_field(&trip.in_route),
            count(trip.calendar_days),
            count(trip.full_days),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Flush(e.to_string()))
}
