use anyhow::Result;
use std::path::PathBuf;

use easterbush_etl::{build_pipeline, Config, DataDirJob};

/// Drive the scan → ingest pipeline over the data directory.
pub async fn run_prepare(config: &Config, data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
    log::info!("Preparing data from {}", data_dir.display());

    let workflow = build_pipeline(data_dir.clone(), config.database_path.clone())?;

    // Pipeline state lives next to the main database.
    let state_path = config
        .database_path
        .parent()
        .map(|p| p.join("pipeline.db"))
        .unwrap_or_else(|| PathBuf::from("pipeline.db"));
    let mut store = treadle::SqliteStateStore::open(&state_path).await?;

    let job = DataDirJob::new("prepare-job", data_dir);

    // Subscribe to events for progress display
    let mut events = workflow.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                treadle::WorkflowEvent::StageStarted { stage, .. } => {
                    println!("  ⏳ [{stage}] Starting...");
                }
                treadle::WorkflowEvent::StageCompleted { stage, .. } => {
                    println!("  ✓ [{stage}] Complete");
                }
                treadle::WorkflowEvent::StageFailed { stage, error, .. } => {
                    eprintln!("  ✗ [{stage}] FAILED: {error}");
                }
                _ => {}
            }
        }
    });

    workflow.advance(&job, &mut store).await?;

    println!("\n✓ Prepare complete");
    Ok(())
}
