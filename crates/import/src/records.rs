use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use sojourn_core::{parse_date, Direction, TravelRecord};

use crate::routes::{known_port, RouteConfig};

fn re_crossing_line() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(\d{2}/\d{2}/\d{4})\s+(\S+)\s+(inbound|outbound)\s+(\S+)\s+(\S+)\s+(\S+)",
        )
        .expect("invalid regex")
    })
}

/// Turns a government travel-history export into ordered, deduplicated
/// border crossings.
///
/// Each usable line reads
/// `<DD/MM/YYYY> <voyage> <Inbound|Outbound> <embark port> <unused> <disembark port>`.
pub struct RecordExtractor {
    config: RouteConfig,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new(RouteConfig::default())
    }
}

impl RecordExtractor {
    pub fn new(config: RouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    pub fn extract(&self, text: &str) -> Vec<TravelRecord> {
        let mut seen: HashSet<(NaiveDate, Direction)> = HashSet::new();
        let mut records = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let Some(record) = self.parse_line(line) else {
                if !line.trim().is_empty() {
                    tracing::debug!(line = line_no + 1, "Skipping unrecognised line");
                }
                continue;
            };

            if !seen.insert((record.date, record.direction)) {
                tracing::debug!(
                    date = %record.date,
                    direction = %record.direction,
                    "Dropping duplicate crossing"
                );
                continue;
            }
            records.push(record);
        }

        // Stable: same-date crossings keep their input order.
        records.sort_by_key(|r| r.date);
        records
    }

    fn parse_line(&self, line: &str) -> Option<TravelRecord> {
        let caps = re_crossing_line().captures(line)?;
        let date = parse_date(&caps[1])?;
        let voyage = &caps[2];
        let direction: Direction = caps[3].parse().ok()?;
        let embark = &caps[4];
        let disembark = &caps[6];

        let route = self.config.describe(direction, voyage, embark, disembark);

        // The port on the UK side of the crossing, when there is one.
        let (primary, secondary) = match direction {
            Direction::Outbound => (embark, disembark),
            Direction::Inbound => (disembark, embark),
        };
        let port = known_port(primary).or_else(|| known_port(secondary));

        let record = TravelRecord::new(date, direction, route);
        Some(match port {
            Some(p) => record.with_port(p),
            None => record,
        })
    }
}

fn default_extractor() -> &'static RecordExtractor {
    static E: OnceLock<RecordExtractor> = OnceLock::new();
    E.get_or_init(RecordExtractor::default)
}

/// Extract crossings using the built-in port table and carrier overrides.
pub fn parse_travel_records(text: &str) -> Vec<TravelRecord> {
    default_extractor().extract(text)
}
