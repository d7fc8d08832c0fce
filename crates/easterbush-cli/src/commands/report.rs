use anyhow::{Context, Result};
use uuid::Uuid;

use easterbush_core::model::RunId;
use easterbush_core::schema::Database;
use easterbush_etl::Config;

/// Print the stored report for a run (latest by default).
pub fn show_report(config: &Config, run_id: Option<String>, json: bool) -> Result<()> {
    let db = Database::open(&config.database_path)?;

    let run = match run_id {
        Some(id) => {
            let uuid = Uuid::parse_str(&id).with_context(|| format!("bad run id {id}"))?;
            db.get_run(&RunId::from_uuid(uuid))?
        }
        None => db
            .latest_run()?
            .context("no runs stored yet; run `easterbush simulate` first")?,
    };
    let totals = db.component_totals(&run.id)?;

    if json {
        let payload = serde_json::json!({
            "run": run,
            "component_totals": totals,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("\n📊 Run {}\n", run.id);
    println!("  Scenario:   {}", run.scenario);
    println!(
        "  Window:     {} → {} ({} min steps)",
        run.window_start.date_naive(),
        run.window_end.date_naive(),
        run.step_minutes
    );
    println!("  Total cost: £{:.2}", run.total_cost_pounds);
    println!("  Emissions:  {:.0} kg CO2", run.total_emissions_kg);
    if run.unserved_heat_kwh > 0.0 || run.unserved_elec_kwh > 0.0 {
        println!(
            "  ⚠ Unserved: {:.1} kWh heat, {:.1} kWh electricity",
            run.unserved_heat_kwh, run.unserved_elec_kwh
        );
    }

    println!("\n  Component totals:");
    for total in totals {
        println!(
            "    {:<22} {:<12} {:>12.1} kWh  £{:>10.2}",
            total.component, total.carrier, total.energy_kwh, total.cost_pounds
        );
    }

    Ok(())
}
