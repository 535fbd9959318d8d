use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sojourn_core::Direction;
use thiserror::Error;

/// Port field value meaning "no port recorded".
pub const PORT_PLACEHOLDER: &str = "0";

const BUILTIN_PORTS: &[(&str, &str)] = &[
    // UK airports
    ("LHR", "London Heathrow"),
    ("LGW", "London Gatwick"),
    ("STN", "London Stansted"),
    ("LTN", "London Luton"),
    ("LCY", "London City"),
    ("SEN", "London Southend"),
    ("MAN", "Manchester"),
    ("BHX", "Birmingham"),
    ("BRS", "Bristol"),
    ("EMA", "East Midlands"),
    ("LPL", "Liverpool"),
    ("NCL", "Newcastle"),
    ("LBA", "Leeds Bradford"),
    ("EDI", "Edinburgh"),
    ("GLA", "Glasgow"),
    ("ABZ", "Aberdeen"),
    ("BFS", "Belfast International"),
    ("BHD", "Belfast City"),
    ("CWL", "Cardiff"),
    ("SOU", "Southampton"),
    // UK rail and sea ports
    ("QQS", "London St Pancras"),
    ("HRW", "Harwich"),
    ("DVR", "Dover"),
    ("PME", "Portsmouth"),
    // Europe
    ("CDG", "Paris Charles de Gaulle"),
    ("ORY", "Paris Orly"),
    ("XPG", "Paris Gare du Nord"),
    ("AMS", "Amsterdam Schiphol"),
    ("HVH", "Hook of Holland"),
    ("BRU", "Brussels"),
    ("FRA", "Frankfurt"),
    ("MUC", "Munich"),
    ("BER", "Berlin Brandenburg"),
    ("ZRH", "Zurich"),
    ("GVA", "Geneva"),
    ("VIE", "Vienna"),
    ("MAD", "Madrid"),
    ("BCN", "Barcelona"),
    ("AGP", "Malaga"),
    ("PMI", "Palma de Mallorca"),
    ("LIS", "Lisbon"),
    ("FAO", "Faro"),
    ("FCO", "Rome Fiumicino"),
    ("MXP", "Milan Malpensa"),
    ("ATH", "Athens"),
    ("DUB", "Dublin"),
    ("CPH", "Copenhagen"),
    ("ARN", "Stockholm Arlanda"),
    ("OSL", "Oslo"),
    ("WAW", "Warsaw"),
    ("PRG", "Prague"),
    ("BUD", "Budapest"),
    ("IST", "Istanbul"),
    // Long haul
    ("JFK", "New York JFK"),
    ("EWR", "Newark"),
    ("BOS", "Boston"),
    ("ORD", "Chicago O'Hare"),
    ("LAX", "Los Angeles"),
    ("SFO", "San Francisco"),
    ("YYZ", "Toronto Pearson"),
    ("DXB", "Dubai"),
    ("DOH", "Doha"),
    ("DEL", "Delhi"),
    ("BOM", "Mumbai"),
    ("SIN", "Singapore Changi"),
    ("HKG", "Hong Kong"),
    ("NRT", "Tokyo Narita"),
    ("HND", "Tokyo Haneda"),
    ("PEK", "Beijing Capital"),
    ("PVG", "Shanghai Pudong"),
    ("SYD", "Sydney"),
    ("MEL", "Melbourne"),
    ("JNB", "Johannesburg"),
    ("CPT", "Cape Town"),
    ("LOS", "Lagos"),
    ("NBO", "Nairobi"),
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse route config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Port code to human-readable name lookup. Codes are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct PortDirectory {
    names: HashMap<String, String>,
}

impl Default for PortDirectory {
    fn default() -> Self {
        let names = BUILTIN_PORTS
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        Self { names }
    }
}

impl PortDirectory {
    pub fn empty() -> Self {
        Self { names: HashMap::new() }
    }

    pub fn insert(&mut self, code: &str, name: &str) {
        self.names.insert(code.trim().to_uppercase(), name.to_string());
    }

    /// Name for `code`, or the code itself when it is unknown.
    pub fn name_for(&self, code: &str) -> String {
        let code = code.trim();
        self.names
            .get(&code.to_uppercase())
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A carrier whose crossings get a fixed route regardless of port codes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteOverride {
    pub name: String,
    /// Case-insensitive substring of the voyage code.
    #[serde(default)]
    pub voyage_contains: Option<String>,
    /// Case-insensitive exact embark port code.
    #[serde(default)]
    pub embark_port: Option<String>,
    pub outbound_route: String,
    pub inbound_route: String,
}

impl RouteOverride {
    pub fn matches(&self, voyage: &str, embark_port: &str) -> bool {
        let by_voyage = self
            .voyage_contains
            .as_deref()
            .is_some_and(|needle| voyage.to_lowercase().contains(&needle.to_lowercase()));
        let by_port = self
            .embark_port
            .as_deref()
            .is_some_and(|port| port.eq_ignore_ascii_case(embark_port.trim()));
        by_voyage || by_port
    }

    pub fn route(&self, direction: Direction) -> &str {
        match direction {
            Direction::Outbound => &self.outbound_route,
            Direction::Inbound => &self.inbound_route,
        }
    }
}

fn builtin_overrides() -> Vec<RouteOverride> {
    vec![
        RouteOverride {
            name: "Stena Line".to_string(),
            voyage_contains: Some("stenaline".to_string()),
            embark_port: None,
            outbound_route: "Harwich → Hook of Holland (Ferry)".to_string(),
            inbound_route: "Hook of Holland → Harwich (Ferry)".to_string(),
        },
        RouteOverride {
            name: "Eurostar".to_string(),
            voyage_contains: Some("9F".to_string()),
            embark_port: Some("QQS".to_string()),
            outbound_route: "London St Pancras → Paris Gare du Nord (Eurostar)".to_string(),
            inbound_route: "Paris Gare du Nord → London St Pancras (Eurostar)".to_string(),
        },
    ]
}

/// On-disk shape of a route config file.
#[derive(Debug, Default, Deserialize)]
struct RouteConfigFile {
    #[serde(default)]
    ports: BTreeMap<String, String>,
    #[serde(default)]
    overrides: Vec<RouteOverride>,
}

/// Everything needed to turn port codes and voyage codes into route text.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub ports: PortDirectory,
    /// Evaluated in order; the first match wins.
    pub overrides: Vec<RouteOverride>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            ports: PortDirectory::default(),
            overrides: builtin_overrides(),
        }
    }
}

impl RouteConfig {
    pub fn new(ports: PortDirectory, overrides: Vec<RouteOverride>) -> Self {
        Self { ports, overrides }
    }

    /// Extend the built-in tables from TOML. Ports in the file replace
    /// built-ins with the same code; overrides in the file run first.
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let file: RouteConfigFile = toml::from_str(toml_content)?;
        let mut config = Self::default();
        for (code, name) in &file.ports {
            config.ports.insert(code, name);
        }
        let mut overrides = file.overrides;
        overrides.append(&mut config.overrides);
        config.overrides = overrides;
        Ok(config)
    }

    pub fn find_override(&self, voyage: &str, embark_port: &str) -> Option<&RouteOverride> {
        self.overrides.iter().find(|o| o.matches(voyage, embark_port))
    }

    /// Route text for one crossing.
    pub fn describe(
        &self,
        direction: Direction,
        voyage: &str,
        embark_port: &str,
        disembark_port: &str,
    ) -> String {
        if let Some(o) = self.find_override(voyage, embark_port) {
            return o.route(direction).to_string();
        }

        let from = known_port(embark_port).map(|c| self.ports.name_for(c));
        let to = known_port(disembark_port).map(|c| self.ports.name_for(c));

        match (from, to) {
            (Some(from), Some(to)) => format!("{from} → {to}"),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => match direction {
                Direction::Outbound => "UK departure".to_string(),
                Direction::Inbound => "UK arrival".to_string(),
            },
        }
    }
}

/// `None` for blank fields and the `"0"` placeholder.
pub(crate) fn known_port(code: &str) -> Option<&str> {
    let code = code.trim();
    (!code.is_empty() && code != PORT_PLACEHOLDER).then_some(code)
}
