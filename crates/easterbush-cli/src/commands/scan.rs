use anyhow::Result;
use std::path::PathBuf;

use easterbush_core::schema::Database;
use easterbush_etl::{Config, ScanStage};

/// Register data files without running the full pipeline.
pub fn run_scan(config: &Config, data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
    log::info!("Scanning {}", data_dir.display());

    let db = Database::open(&config.database_path)?;
    let stage = ScanStage::new(data_dir, config.database_path.clone());
    let registered = stage.scan(&db)?;

    println!("✓ Scan complete: {registered} new datasets registered");
    println!("  Run `easterbush prepare` to ingest them");
    Ok(())
}
