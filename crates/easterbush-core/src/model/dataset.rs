use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// What kind of input a discovered data file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// AMR half-hourly heat meter export.
    HeatDemand,
    /// AMR half-hourly electricity meter export.
    ElecDemand,
    /// Agile wholesale electricity price export.
    ElecPrice,
}

impl DatasetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeatDemand => "heat_demand",
            Self::ElecDemand => "elec_demand",
            Self::ElecPrice => "elec_price",
        }
    }

    #[must_use]
    pub fn from_str_opt(name: &str) -> Option<Self> {
        match name {
            "heat_demand" => Some(Self::HeatDemand),
            "elec_demand" => Some(Self::ElecDemand),
            "elec_price" => Some(Self::ElecPrice),
            _ => None,
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered input data file.
///
/// The scan stage creates these; the ingest stage fills in the point
/// count and time range after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub kind: DatasetKind,
    pub path: PathBuf,
    pub points: Option<u64>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    pub ingested_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
}

impl Dataset {
    #[must_use]
    pub fn new(kind: DatasetKind, path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            path,
            points: None,
            range_start: None,
            range_end: None,
            ingested_at: None,
            registered_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_kind_round_trip() {
        for kind in [
            DatasetKind::HeatDemand,
            DatasetKind::ElecDemand,
            DatasetKind::ElecPrice,
        ] {
            assert_eq!(DatasetKind::from_str_opt(kind.as_str()), Some(kind));
        }
        assert_eq!(DatasetKind::from_str_opt("gas_demand"), None);
    }

    #[test]
    fn test_dataset_new_is_uningested() {
        let dataset = Dataset::new(DatasetKind::HeatDemand, PathBuf::from("/data/heat.csv"));
        assert!(dataset.points.is_none());
        assert!(dataset.ingested_at.is_none());
    }
}
