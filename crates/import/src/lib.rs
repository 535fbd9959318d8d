pub mod analyze;
pub mod csv;
pub mod export;
pub mod records;
pub mod routes;
pub mod table;
pub(crate) mod util;
pub mod xlsx;

pub use analyze::{analyze_travel_history, analyze_with, AnalysisResult, TravelSummary};
pub use self::csv::{parse_clipboard_text, parse_csv_text, CsvImporter};
pub use export::{export_trips_csv, ExportError, EXPORT_HEADERS};
pub use records::{parse_travel_records, RecordExtractor};
pub use routes::{ConfigError, PortDirectory, RouteConfig, RouteOverride};
pub use table::{Column, ParseResult, ParsedTrip};
pub use util::sanitize_field;
pub use xlsx::{parse_xlsx_bytes, parse_xlsx_file, WorkbookError, TRAVEL_HISTORY_SHEET};

pub mod import {
    use crate::*;

    /// Which reader a trips file needs, judged by its extension.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TripFileKind {
        Delimited,
        Workbook,
    }

    impl TripFileKind {
        pub fn from_path(path: &std::path::Path) -> Self {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_lowercase();
            match ext.as_str() {
                "xlsx" | "xlsm" => TripFileKind::Workbook,
                _ => TripFileKind::Delimited,
            }
        }
    }

    pub async fn import_trips_file(path: &std::path::Path) -> Result<ParseResult, std::io::Error> {
        match TripFileKind::from_path(path) {
            TripFileKind::Workbook => Ok(parse_xlsx_file(path).await),
            TripFileKind::Delimited => {
                let text = tokio::fs::read_to_string(path).await?;
                Ok(parse_csv_text(&text))
            }
        }
    }

    pub fn create_extractor(config: RouteConfig) -> RecordExtractor {
        RecordExtractor::new(config)
    }

    pub fn load_route_config(toml_content: &str) -> Result<RouteConfig, ConfigError> {
        RouteConfig::from_toml(toml_content)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::path::Path;

        #[test]
        fn kind_from_extension() {
            assert_eq!(TripFileKind::from_path(Path::new("a.XLSX")), TripFileKind::Workbook);
            assert_eq!(TripFileKind::from_path(Path::new("a.csv")), TripFileKind::Delimited);
            assert_eq!(TripFileKind::from_path(Path::new("a.tsv")), TripFileKind::Delimited);
            assert_eq!(TripFileKind::from_path(Path::new("noext")), TripFileKind::Delimited);
        }

        #[tokio::test]
        async fn imports_csv_from_disk() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("trips.csv");
            std::fs::write(&path, "Date Out,Date In\n15/01/2024,20/01/2024\n").unwrap();
            let result = import_trips_file(&path).await.unwrap();
            assert!(result.success);
            assert_eq!(result.trips.len(), 1);
        }

        #[tokio::test]
        async fn missing_csv_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            assert!(import_trips_file(&dir.path().join("nope.csv")).await.is_err());
        }
    }
}
