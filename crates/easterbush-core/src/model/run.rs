use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The persisted record of one dispatch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    pub scenario: u8,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub step_minutes: i64,
    pub total_cost_pounds: f64,
    pub total_emissions_kg: f64,
    pub unserved_heat_kwh: f64,
    pub unserved_elec_kwh: f64,
    pub created_at: DateTime<Utc>,
}

impl RunRecord {
    #[must_use]
    pub fn new(
        scenario: u8,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        step_minutes: i64,
    ) -> Self {
        Self {
            id: RunId::new(),
            scenario,
            window_start,
            window_end,
            step_minutes,
            total_cost_pounds: 0.0,
            total_emissions_kg: 0.0,
            unserved_heat_kwh: 0.0,
            unserved_elec_kwh: 0.0,
            created_at: Utc::now(),
        }
    }
}

/// Per-component delivered energy and operating cost for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTotal {
    pub component: String,
    pub carrier: String,
    pub energy_kwh: f64,
    pub cost_pounds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_generation() {
        let id1 = RunId::new();
        let id2 = RunId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_run_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = RunId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_run_record_new() {
        let start = Utc::now();
        let record = RunRecord::new(1, start, start, 30);
        assert_eq!(record.scenario, 1);
        assert_eq!(record.step_minutes, 30);
        assert_eq!(record.total_cost_pounds, 0.0);
    }
}
