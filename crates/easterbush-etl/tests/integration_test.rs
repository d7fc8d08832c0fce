//! Integration tests for the scan → ingest pipeline and data loaders.
//!
//! These tests run against temporary directories with synthetic campus
//! exports, so no real meter data or network access is required.

use std::path::PathBuf;
use tempfile::TempDir;

use easterbush_core::schema::Database;
use easterbush_etl::{build_pipeline, DataDirJob};
use treadle::WorkItem;

/// Test that the pipeline can be built and wired correctly
#[tokio::test]
async fn test_pipeline_construction() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();
    let db_path = temp_dir.path().join("test.db");

    let result = build_pipeline(data_dir, db_path);

    assert!(result.is_ok(), "Pipeline should build successfully");
}

/// Test database initialization and schema creation
#[test]
fn test_database_schema_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::open(&db_path).expect("Failed to open database");

    assert_eq!(db.dataset_count().unwrap(), 0);
    assert_eq!(db.run_count().unwrap(), 0);
    assert!(db.latest_run().unwrap().is_none());
}

/// Test work item creation
#[test]
fn test_data_dir_job_work_item() {
    let path = PathBuf::from("/campus/data");
    let work_item = DataDirJob::new("prepare-job", path.clone());

    assert_eq!(work_item.id(), "prepare-job");
    assert_eq!(work_item.data_dir, path);

    let display = format!("{}", work_item);
    assert_eq!(display, "/campus/data");
}

/// Datasets registered by hand survive a reopen of the database.
#[test]
fn test_dataset_registry_persists() {
    use easterbush_core::model::{Dataset, DatasetKind};

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    {
        let db = Database::open(&db_path).unwrap();
        db.upsert_dataset(&Dataset::new(
            DatasetKind::ElecPrice,
            temp_dir.path().join("agileout.csv"),
        ))
        .unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    assert_eq!(db.dataset_count().unwrap(), 1);
    let datasets = db.list_datasets().unwrap();
    assert_eq!(datasets[0].kind, DatasetKind::ElecPrice);
}
