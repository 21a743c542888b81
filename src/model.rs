use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One affected airport within a region. The airline-specific extra fields
/// (`period` for ANA, `date` + `content` for JAL) live in `attributes`; a
/// BTreeMap keeps their serialized key order deterministic, which the
/// canonical comparison form relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportEntry {
    pub name: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl AirportEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// All affected airports published for one region. Airport order as scraped
/// from the page is not significant; comparisons go through
/// [`crate::policy::normalize`], which sorts by airport name first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightInfo {
    pub region: String,
    pub airports: Vec<AirportEntry>,
}

/// The full set of irregularity entries observed in one check cycle, plus
/// when the check ran. Built fresh every cycle and replaced wholesale; an
/// empty `flight_infos` is the meaningful "no irregularities" state, not a
/// missing one.
///
/// This is also the persisted shape: one JSON document per airline source
/// with `lastCheck` and `flightInfos` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub last_check: DateTime<Utc>,
    pub flight_infos: Vec<FlightInfo>,
}

impl Snapshot {
    pub fn new(last_check: DateTime<Utc>, flight_infos: Vec<FlightInfo>) -> Self {
        Self {
            last_check,
            flight_infos,
        }
    }

    pub fn empty(last_check: DateTime<Utc>) -> Self {
        Self::new(last_check, Vec::new())
    }

    pub fn is_clear(&self) -> bool {
        self.flight_infos.is_empty()
    }
}
