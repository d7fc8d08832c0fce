use std::path::{Path, PathBuf};

use treadle::{Stage, StageContext, StageOutcome};
use walkdir::WalkDir;

use easterbush_core::model::{Dataset, DatasetKind};
use easterbush_core::schema::Database;

use crate::error::EtlResult;

/// The Scan stage: walk the data directory and register input files.
///
/// Scanning is idempotent: paths already in the registry are left
/// untouched (their ingest results survive), new paths are registered
/// uningested.
#[derive(Debug)]
pub struct ScanStage {
    data_dir: PathBuf,
    db_path: PathBuf,
}

impl ScanStage {
    #[must_use]
    pub fn new(data_dir: PathBuf, db_path: PathBuf) -> Self {
        Self { data_dir, db_path }
    }

    /// Classify a file by name. The campus exports are recognisable from
    /// their filenames: AMR meter files name their meter and carrier,
    /// and the price export is the Agile dump.
    fn classify(path: &Path) -> Option<DatasetKind> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        if extension != "csv" {
            return None;
        }

        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.contains("agile") {
            Some(DatasetKind::ElecPrice)
        } else if name.contains("amr") && name.contains("heat") {
            Some(DatasetKind::HeatDemand)
        } else if name.contains("amr") && name.contains("elec") {
            Some(DatasetKind::ElecDemand)
        } else {
            None
        }
    }

    /// Scan once against an open database, outside the pipeline.
    pub fn scan(&self, db: &Database) -> EtlResult<usize> {
        self.scan_directory(db)
    }

    fn scan_directory(&self, db: &Database) -> EtlResult<usize> {
        let mut registered = 0;

        for entry in WalkDir::new(&self.data_dir)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(kind) = Self::classify(path) else {
                continue;
            };

            if db.get_dataset_by_path(path)?.is_some() {
                log::debug!("Already registered: {}", path.display());
                continue;
            }

            log::debug!("Registering {kind} dataset: {}", path.display());
            db.upsert_dataset(&Dataset::new(kind, path.to_path_buf()))?;
            registered += 1;
        }

        Ok(registered)
    }
}

#[async_trait::async_trait]
impl Stage for ScanStage {
    fn name(&self) -> &str {
        "scan"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        _context: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Starting scan of {}", self.data_dir.display());

        let db = Database::open(&self.db_path).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to open database: {e}"))
        })?;

        match self.scan_directory(&db) {
            Ok(count) => {
                log::info!("Scan complete: {} new datasets registered", count);
                Ok(StageOutcome::Complete)
            }
            Err(e) => Err(treadle::TreadleError::StageExecution(format!(
                "Scan failed: {e}"
            ))),
        }
    }
}
