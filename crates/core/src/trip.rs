use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{calendar_days_between, full_days_from};
use crate::record::{Direction, TravelRecord};

pub const NO_RETURN_RECORDED: &str = "No return recorded";
pub const NO_DEPARTURE_RECORDED: &str = "No departure recorded";

/// A journey out of the UK, possibly missing one of its legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: u32,
    pub out_date: Option<NaiveDate>,
    pub in_date: Option<NaiveDate>,
    pub out_route: String,
    pub in_route: String,
    /// `in_date - out_date`; `None` unless both legs are known.
    pub calendar_days: Option<i64>,
    /// Days wholly outside the UK (travel days excluded). Never negative.
    pub full_days: Option<i64>,
}

impl Trip {
    pub fn complete(
        id: u32,
        out_date: NaiveDate,
        in_date: NaiveDate,
        out_route: impl Into<String>,
        in_route: impl Into<String>,
    ) -> Self {
        let calendar_days = calendar_days_between(out_date, in_date);
        Trip {
            id,
            out_date: Some(out_date),
            in_date: Some(in_date),
            out_route: out_route.into(),
            in_route: in_route.into(),
            calendar_days: Some(calendar_days),
            full_days: Some(full_days_from(calendar_days)),
        }
    }

    pub fn missing_return(id: u32, out_date: NaiveDate, out_route: impl Into<String>) -> Self {
        Trip {
            id,
            out_date: Some(out_date),
            in_date: None,
            out_route: out_route.into(),
            in_route: NO_RETURN_RECORDED.to_string(),
            calendar_days: None,
            full_days: None,
        }
    }

    pub fn missing_departure(id: u32, in_date: NaiveDate, in_route: impl Into<String>) -> Self {
        Trip {
            id,
            out_date: None,
            in_date: Some(in_date),
            out_route: NO_DEPARTURE_RECORDED.to_string(),
            in_route: in_route.into(),
            calendar_days: None,
            full_days: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.full_days.is_some()
    }
}

/// Pair chronologically ordered crossings into trips.
///
/// Each outbound record claims the nearest later inbound record, even when
/// other outbound records sit in between; those skipped outbound records are
/// absorbed into the trip and do not produce trips of their own. An inbound
/// record nobody claimed becomes a trip with no departure.
pub fn pair_trips(records: &[TravelRecord]) -> Vec<Trip> {
    let mut trips = Vec::new();
    let mut next_id = 1u32;
    let mut i = 0;

    while i < records.len() {
        let current = &records[i];
        match current.direction {
            Direction::Outbound => {
                let inbound = records[i + 1..]
                    .iter()
                    .position(|r| r.direction == Direction::Inbound)
                    .map(|offset| i + 1 + offset);

                match inbound {
                    Some(j) => {
                        let ret = &records[j];
                        trips.push(Trip::complete(
                            next_id,
                            current.date,
                            ret.date,
                            current.route.clone(),
                            ret.route.clone(),
                        ));
                        i = j + 1;
                    }
                    None => {
                        trips.push(Trip::missing_return(next_id, current.date, current.route.clone()));
                        i += 1;
                    }
                }
            }
            Direction::Inbound => {
                trips.push(Trip::missing_departure(next_id, current.date, current.route.clone()));
                i += 1;
            }
        }
        next_id += 1;
    }

    trips
}
