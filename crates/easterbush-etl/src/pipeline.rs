use std::path::PathBuf;
use treadle::Workflow;

use crate::{IngestStage, ScanStage};

/// Build the scan + ingest pipeline.
///
/// # Errors
/// Returns an error if the workflow cannot be built.
pub fn build_pipeline(data_dir: PathBuf, db_path: PathBuf) -> treadle::Result<Workflow> {
    let scan_stage = ScanStage::new(data_dir, db_path.clone());
    let ingest_stage = IngestStage::new(db_path);

    Workflow::builder()
        .stage("scan", scan_stage)
        .stage("ingest", ingest_stage)
        .dependency("ingest", "scan")
        .build()
}
