use anyhow::Result;

use easterbush_core::schema::Database;
use easterbush_etl::Config;

/// Show dataset registry and run history at a glance.
pub fn show_status(config: &Config) -> Result<()> {
    let db = Database::open(&config.database_path)?;

    let datasets = db.list_datasets()?;
    let run_count = db.run_count()?;

    println!("\n📊 Easterbush Status\n");
    println!("  Database: {}", config.database_path.display());
    println!("  Datasets: {}", datasets.len());

    for dataset in &datasets {
        let state = match (dataset.points, dataset.range_start, dataset.range_end) {
            (Some(points), Some(start), Some(end)) => {
                format!("{points} points, {} → {}", start.date_naive(), end.date_naive())
            }
            _ => "not ingested".to_string(),
        };
        println!(
            "    {:<12} {}  ({state})",
            dataset.kind.to_string(),
            dataset.path.display()
        );
    }

    if datasets.is_empty() {
        println!("\n  Run `easterbush scan <data_dir>` to register input files");
    }

    println!("\n  Runs: {run_count}");
    for run in db.list_runs(5)? {
        println!(
            "    {}  scenario {}  {} → {}  £{:.0}",
            run.id,
            run.scenario,
            run.window_start.date_naive(),
            run.window_end.date_naive(),
            run.total_cost_pounds
        );
    }

    if run_count == 0 {
        println!("\n  Run `easterbush simulate --scenario 1 --start 2019-01-01 --end 2019-02-01`");
    }

    Ok(())
}
