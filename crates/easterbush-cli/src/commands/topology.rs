use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

use easterbush_core::model::SiteData;
use easterbush_core::params::ScenarioParams;
use easterbush_core::series::{Series, Snapshots};
use easterbush_network::{build_scenario, topology, Scenario};

/// Describe a scenario's plant wiring.
///
/// Topology does not depend on the metered values, so the network is
/// assembled over a one-day placeholder window with unit data.
pub fn show_topology(scenario: u8, dot: bool) -> Result<()> {
    let scenario = Scenario::from_number(scenario)
        .with_context(|| format!("unknown scenario {scenario}; expected 1, 2, or 3"))?;

    let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).single().context("bad window")?;
    let end = Utc.with_ymd_and_hms(2019, 1, 1, 23, 30, 0).single().context("bad window")?;
    let snapshots = Snapshots::half_hourly(start, end)?;

    let data = SiteData {
        heat_demand: Series::constant(&snapshots, 1.0),
        elec_demand: Series::constant(&snapshots, 1.0),
        elec_price: Series::constant(&snapshots, 10.0),
        gas_price: Series::constant(&snapshots, 2.5),
    };

    let params = ScenarioParams::default();
    let network = build_scenario(scenario, snapshots, &data, &params)?;
    topology::validate(&network)?;

    if dot {
        print!("{}", topology::to_dot(&network));
    } else {
        println!("{scenario}: {}", scenario.describe());
        print!("{}", topology::describe(&network));
    }

    Ok(())
}
