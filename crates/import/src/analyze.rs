use serde::{Deserialize, Serialize};
use sojourn_core::{pair_trips, TravelRecord, Trip};

use crate::records::{parse_travel_records, RecordExtractor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelSummary {
    pub total_trips: usize,
    pub complete_trips: usize,
    pub incomplete_trips: usize,
    /// Sum of full days abroad over complete trips only.
    pub total_full_days: i64,
}

impl TravelSummary {
    pub fn from_trips(trips: &[Trip]) -> Self {
        let complete_trips = trips.iter().filter(|t| t.is_complete()).count();
        Self {
            total_trips: trips.len(),
            complete_trips,
            incomplete_trips: trips.len() - complete_trips,
            total_full_days: trips.iter().filter_map(|t| t.full_days).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub records: Vec<TravelRecord>,
    pub trips: Vec<Trip>,
    pub summary: TravelSummary,
}

impl AnalysisResult {
    pub fn from_records(records: Vec<TravelRecord>) -> Self {
        let trips = pair_trips(&records);
        let summary = TravelSummary::from_trips(&trips);
        tracing::info!(
            records = records.len(),
            trips = summary.total_trips,
            incomplete = summary.incomplete_trips,
            full_days = summary.total_full_days,
            "Analysed travel history"
        );
        Self { records, trips, summary }
    }
}

/// Extract, pair and summarise a travel-history export.
pub fn analyze_travel_history(text: &str) -> AnalysisResult {
    AnalysisResult::from_records(parse_travel_records(text))
}

/// As [`analyze_travel_history`], with a caller-supplied extractor.
pub fn analyze_with(extractor: &RecordExtractor, text: &str) -> AnalysisResult {
    AnalysisResult::from_records(extractor.extract(text))
}
