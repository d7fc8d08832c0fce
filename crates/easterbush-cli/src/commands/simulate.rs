use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use easterbush_core::params::ScenarioParams;
use easterbush_core::schema::Database;
use easterbush_core::series::Snapshots;
use easterbush_etl::{load_site_data, Config};
use easterbush_network::{analyse, build_scenario, render_report, topology, Dispatcher, Scenario};

/// Load the window, build the scenario, dispatch, report, persist.
pub fn run_simulate(
    config: &Config,
    scenario: u8,
    start: NaiveDate,
    end: NaiveDate,
    params_path: Option<PathBuf>,
) -> Result<()> {
    let scenario = Scenario::from_number(scenario)
        .with_context(|| format!("unknown scenario {scenario}; expected 1, 2, or 3"))?;

    let Some(start_ts) = start.and_hms_opt(0, 0, 0) else {
        bail!("bad start date");
    };
    let Some(end_ts) = end.and_hms_opt(23, 30, 0) else {
        bail!("bad end date");
    };
    let snapshots = Snapshots::half_hourly(start_ts.and_utc(), end_ts.and_utc())?;

    println!(
        "Running {scenario} ({}) over {} → {}",
        scenario.describe(),
        start,
        end
    );

    let params = match params_path {
        Some(path) => ScenarioParams::load(&path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => ScenarioParams::default(),
    };
    let data = load_site_data(config, &snapshots, scenario.uses_static_elec_price())?;

    let network = build_scenario(scenario, snapshots, &data, &params)?;
    topology::validate(&network)?;

    let result = Dispatcher::new(&network, &params)?.run()?;
    let summary = analyse(&network, &result)?;

    print!("{}", render_report(&summary));

    let record = summary.to_run_record(scenario.number(), network.snapshots());
    let db = Database::open(&config.database_path)?;
    db.insert_run(&record)?;
    db.insert_component_totals(&record.id, &summary.component_totals)?;

    println!("\n  Run stored as {}", record.id);
    Ok(())
}
