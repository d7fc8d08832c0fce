use std::path::PathBuf;

use chrono::Utc;
use treadle::{Stage, StageContext, StageOutcome};

use easterbush_core::model::{Dataset, DatasetKind};
use easterbush_core::schema::Database;
use easterbush_core::series::Series;

use crate::error::EtlResult;
use crate::meter::parse_meter_csv;
use crate::tariff::parse_agile_csv;

/// The Ingest stage: parse each registered dataset and record its point
/// count and time range.
///
/// A dataset that fails to parse is logged and skipped; the registry
/// keeps it uningested so `status` can surface the problem.
#[derive(Debug)]
pub struct IngestStage {
    db_path: PathBuf,
}

impl IngestStage {
    #[must_use]
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    fn parse_dataset(dataset: &Dataset) -> EtlResult<Series> {
        match dataset.kind {
            DatasetKind::HeatDemand | DatasetKind::ElecDemand => parse_meter_csv(&dataset.path),
            DatasetKind::ElecPrice => parse_agile_csv(&dataset.path),
        }
    }

    fn ingest_all(&self, db: &Database) -> EtlResult<usize> {
        let mut ingested = 0;

        for mut dataset in db.list_datasets()? {
            log::debug!("Ingesting: {}", dataset.path.display());

            let series = match Self::parse_dataset(&dataset) {
                Ok(series) => series,
                Err(e) => {
                    log::warn!("Failed to ingest {}: {e}", dataset.path.display());
                    continue;
                }
            };

            if series.is_empty() {
                log::warn!("No data points in {}", dataset.path.display());
                continue;
            }

            dataset.points = Some(series.len() as u64);
            dataset.range_start = series.index().first().copied();
            dataset.range_end = series.index().last().copied();
            dataset.ingested_at = Some(Utc::now());
            db.upsert_dataset(&dataset)?;
            ingested += 1;
        }

        Ok(ingested)
    }
}

#[async_trait::async_trait]
impl Stage for IngestStage {
    fn name(&self) -> &str {
        "ingest"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        _context: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Starting ingest");

        let db = Database::open(&self.db_path).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to open database: {e}"))
        })?;

        match self.ingest_all(&db) {
            Ok(count) => {
                log::info!("Ingest complete: {} datasets", count);
                Ok(StageOutcome::Complete)
            }
            Err(e) => Err(treadle::TreadleError::StageExecution(format!(
                "Ingest failed: {e}"
            ))),
        }
    }
}
