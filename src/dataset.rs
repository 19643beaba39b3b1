//! Dataset model and GeoJSON decoding
//!
//! The dashboard reads a GeoJSON FeatureCollection where every feature carries one
//! postcode's infection history in its `properties`. Geometry is left to the map layer
//! and is not decoded here.

use {
    crate::days::{self, Day},
    serde::{Deserialize, Serialize},
    std::collections::{BTreeMap, BTreeSet},
};

/// Source name → case count for a single day
pub type SourceCounts = BTreeMap<String, u64>;

/// Infection history for one postcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfectionRecord {
    pub postcode: String,
    /// Day key (`yyyy-mm-dd`) → per-source counts
    pub infections: BTreeMap<String, SourceCounts>,
    pub tests: u64,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: InfectionRecord,
}

/// All records for the session, immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<InfectionRecord>,
}

impl Dataset {
    pub fn new(records: Vec<InfectionRecord>) -> Self {
        Self { records }
    }

    /// Decode a GeoJSON document; any mismatch rejects the whole document
    pub fn from_geojson(json: &str) -> Result<Self, serde_json::Error> {
        let collection: FeatureCollection = serde_json::from_str(json)?;
        Ok(Self::new(
            collection.features.into_iter().map(|f| f.properties).collect(),
        ))
    }

    pub fn records(&self) -> &[InfectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact postcode lookup; with duplicates the last record wins, matching aggregation
    pub fn find(&self, postcode: &str) -> Option<&InfectionRecord> {
        self.records.iter().rev().find(|r| r.postcode == postcode)
    }

    /// Every parseable day key across the dataset
    fn parsed_days(&self) -> impl Iterator<Item = Day> + '_ {
        self.records
            .iter()
            .flat_map(|r| r.infections.keys())
            .filter_map(|key| days::parse_day(key).ok())
    }
}

/// Union of source names across all records and days
pub fn discover_sources(dataset: &Dataset) -> BTreeSet<String> {
    dataset
        .records()
        .iter()
        .flat_map(|r| r.infections.values())
        .flat_map(|counts| counts.keys().cloned())
        .collect()
}

/// Earliest parseable day, or the epoch when nothing parses
pub fn min_date(dataset: &Dataset) -> Day {
    dataset.parsed_days().min().unwrap_or_else(days::epoch)
}

/// Latest parseable day, or the epoch when nothing parses
pub fn max_date(dataset: &Dataset) -> Day {
    dataset.parsed_days().max().unwrap_or_else(days::epoch)
}
