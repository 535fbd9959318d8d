use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outbound,
    Inbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => write!(f, "Outbound"),
            Direction::Inbound => write!(f, "Inbound"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "outbound" => Ok(Direction::Outbound),
            "inbound" => Ok(Direction::Inbound),
            other => Err(format!("Unknown direction: '{other}'")),
        }
    }
}

/// One border crossing as it appears in a travel-history export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelRecord {
    pub date: NaiveDate,
    pub direction: Direction,
    /// Human-readable description, e.g. `London Heathrow → Paris Charles de Gaulle`.
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl TravelRecord {
    pub fn new(date: NaiveDate, direction: Direction, route: impl Into<String>) -> Self {
        TravelRecord {
            date,
            direction,
            route: route.into(),
            port: None,
        }
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }
}
