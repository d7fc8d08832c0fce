use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{ComponentTotal, Dataset, DatasetKind, RunId, RunRecord};

use super::migrations::MIGRATIONS;

/// A database connection with CRUD methods for datasets and runs.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        // Create migrations table if it doesn't exist
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        // Get applied migrations
        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // Apply pending migrations
        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

fn parse_ts(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::InvalidData(format!("bad timestamp {text} in database: {e}")))
}

fn parse_ts_opt(text: Option<String>) -> Result<Option<DateTime<Utc>>> {
    text.as_deref().map(parse_ts).transpose()
}

// Dataset registry
impl Database {
    /// Register a dataset, or refresh the registration when the path is
    /// already known.
    pub fn upsert_dataset(&self, dataset: &Dataset) -> Result<()> {
        self.conn.execute(
            "INSERT INTO datasets (
                id, kind, path, points, range_start, range_end, ingested_at, registered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(path) DO UPDATE SET
                kind = excluded.kind,
                points = excluded.points,
                range_start = excluded.range_start,
                range_end = excluded.range_end,
                ingested_at = excluded.ingested_at",
            rusqlite::params![
                dataset.id,
                dataset.kind.as_str(),
                dataset.path.to_string_lossy().as_ref(),
                dataset.points.map(|p| p as i64),
                dataset.range_start.map(|t| t.to_rfc3339()),
                dataset.range_end.map(|t| t.to_rfc3339()),
                dataset.ingested_at.map(|t| t.to_rfc3339()),
                dataset.registered_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up a dataset by file path.
    pub fn get_dataset_by_path(&self, path: &Path) -> Result<Option<Dataset>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, path, points, range_start, range_end, ingested_at, registered_at
             FROM datasets WHERE path = ?1",
        )?;
        let rows = stmt
            .query_map([path.to_string_lossy().as_ref()], Self::dataset_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().next().map(Self::dataset_from_row).transpose()
    }

    /// List all registered datasets, newest first.
    pub fn list_datasets(&self) -> Result<Vec<Dataset>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, path, points, range_start, range_end, ingested_at, registered_at
             FROM datasets ORDER BY registered_at DESC",
        )?;
        let rows = stmt
            .query_map([], Self::dataset_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(Self::dataset_from_row).collect()
    }

    /// Number of registered datasets.
    pub fn dataset_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM datasets", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    #[allow(clippy::type_complexity)]
    fn dataset_row(
        row: &rusqlite::Row<'_>,
    ) -> rusqlite::Result<(
        String,
        String,
        String,
        Option<i64>,
        Option<String>,
        Option<String>,
        Option<String>,
        String,
    )> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
        ))
    }

    #[allow(clippy::type_complexity)]
    fn dataset_from_row(
        row: (
            String,
            String,
            String,
            Option<i64>,
            Option<String>,
            Option<String>,
            Option<String>,
            String,
        ),
    ) -> Result<Dataset> {
        let (id, kind, path, points, range_start, range_end, ingested_at, registered_at) = row;
        let kind = DatasetKind::from_str_opt(&kind)
            .ok_or_else(|| Error::InvalidData(format!("unknown dataset kind {kind}")))?;
        Ok(Dataset {
            id,
            kind,
            path: PathBuf::from(path),
            points: points.map(|p| p as u64),
            range_start: parse_ts_opt(range_start)?,
            range_end: parse_ts_opt(range_end)?,
            ingested_at: parse_ts_opt(ingested_at)?,
            registered_at: parse_ts(&registered_at)?,
        })
    }
}

// Run history
impl Database {
    /// Insert a completed run.
    pub fn insert_run(&self, run: &RunRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO runs (
                id, scenario, window_start, window_end, step_minutes,
                total_cost_pounds, total_emissions_kg,
                unserved_heat_kwh, unserved_elec_kwh, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                run.id.to_string(),
                i64::from(run.scenario),
                run.window_start.to_rfc3339(),
                run.window_end.to_rfc3339(),
                run.step_minutes,
                run.total_cost_pounds,
                run.total_emissions_kg,
                run.unserved_heat_kwh,
                run.unserved_elec_kwh,
                run.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Fetch a run by id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no run has the given id.
    pub fn get_run(&self, id: &RunId) -> Result<RunRecord> {
        self.query_runs("WHERE id = ?1", rusqlite::params![id.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                entity: "run",
                id: id.to_string(),
            })
    }

    /// List the most recent runs.
    pub fn list_runs(&self, limit: u32) -> Result<Vec<RunRecord>> {
        self.query_runs(
            "ORDER BY created_at DESC LIMIT ?1",
            rusqlite::params![limit],
        )
    }

    /// Most recent run, if any.
    pub fn latest_run(&self) -> Result<Option<RunRecord>> {
        Ok(self.list_runs(1)?.into_iter().next())
    }

    /// Number of stored runs.
    pub fn run_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn query_runs(
        &self,
        clause: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<RunRecord>> {
        let sql = format!(
            "SELECT id, scenario, window_start, window_end, step_minutes,
                    total_cost_pounds, total_emissions_kg,
                    unserved_heat_kwh, unserved_elec_kwh, created_at
             FROM runs {clause}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        #[allow(clippy::type_complexity)]
        let rows: Vec<(String, i64, String, String, i64, f64, f64, f64, f64, String)> = stmt
            .query_map(params, |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|row| {
                let (
                    id,
                    scenario,
                    window_start,
                    window_end,
                    step_minutes,
                    total_cost_pounds,
                    total_emissions_kg,
                    unserved_heat_kwh,
                    unserved_elec_kwh,
                    created_at,
                ) = row;
                let uuid = Uuid::parse_str(&id)
                    .map_err(|e| Error::InvalidData(format!("bad run id {id}: {e}")))?;
                Ok(RunRecord {
                    id: RunId::from_uuid(uuid),
                    scenario: scenario as u8,
                    window_start: parse_ts(&window_start)?,
                    window_end: parse_ts(&window_end)?,
                    step_minutes,
                    total_cost_pounds,
                    total_emissions_kg,
                    unserved_heat_kwh,
                    unserved_elec_kwh,
                    created_at: parse_ts(&created_at)?,
                })
            })
            .collect()
    }

    /// Insert the per-component totals for a run.
    pub fn insert_component_totals(
        &self,
        run_id: &RunId,
        totals: &[ComponentTotal],
    ) -> Result<()> {
        for total in totals {
            self.conn.execute(
                "INSERT INTO component_totals (run_id, component, carrier, energy_kwh, cost_pounds)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    run_id.to_string(),
                    total.component,
                    total.carrier,
                    total.energy_kwh,
                    total.cost_pounds,
                ],
            )?;
        }
        Ok(())
    }

    /// Fetch the per-component totals of a run, largest energy first.
    pub fn component_totals(&self, run_id: &RunId) -> Result<Vec<ComponentTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT component, carrier, energy_kwh, cost_pounds
             FROM component_totals WHERE run_id = ?1
             ORDER BY energy_kwh DESC",
        )?;
        let totals = stmt
            .query_map([run_id.to_string()], |row| {
                Ok(ComponentTotal {
                    component: row.get(0)?,
                    carrier: row.get(1)?,
                    energy_kwh: row.get(2)?,
                    cost_pounds: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(totals)
    }
}
