/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Registered input data files (AMR meter exports, price exports)
CREATE TABLE IF NOT EXISTS datasets (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    path TEXT NOT NULL UNIQUE,
    points INTEGER,
    range_start TEXT,
    range_end TEXT,
    ingested_at TEXT,
    registered_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_datasets_kind ON datasets(kind);

-- One row per dispatch run
CREATE TABLE IF NOT EXISTS runs (
    id TEXT PRIMARY KEY,
    scenario INTEGER NOT NULL,
    window_start TEXT NOT NULL,
    window_end TEXT NOT NULL,
    step_minutes INTEGER NOT NULL,
    total_cost_pounds REAL NOT NULL,
    total_emissions_kg REAL NOT NULL,
    unserved_heat_kwh REAL NOT NULL,
    unserved_elec_kwh REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_runs_created_at ON runs(created_at);

-- Per-component delivered energy and cost for each run
CREATE TABLE IF NOT EXISTS component_totals (
    run_id TEXT NOT NULL REFERENCES runs(id),
    component TEXT NOT NULL,
    carrier TEXT NOT NULL,
    energy_kwh REAL NOT NULL,
    cost_pounds REAL NOT NULL,
    PRIMARY KEY (run_id, component)
);
";

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial schema",
    sql: MIGRATION_001,
}];
