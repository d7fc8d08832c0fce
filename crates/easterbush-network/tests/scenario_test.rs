//! End-to-end scenario tests over synthetic site data.
//!
//! These build full scenario networks, validate their topology, run the
//! dispatch engine, and check the books balance. No real meter exports
//! are required.

use chrono::{TimeZone, Utc};

use easterbush_core::model::SiteData;
use easterbush_core::params::ScenarioParams;
use easterbush_core::series::{Series, Snapshots};
use easterbush_network::{analyse, build_scenario, names, topology, Dispatcher, Scenario};

fn window(days: i64) -> Snapshots {
    let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
    let end = start + chrono::Duration::days(days) - chrono::Duration::minutes(30);
    Snapshots::half_hourly(start, end).unwrap()
}

/// Volatile tariff, steady heat, daily-shaped electricity demand.
fn synthetic_site(snapshots: &Snapshots) -> SiteData {
    let n = snapshots.len();
    let elec_price: Vec<f64> = (0..n).map(|t| if (t / 4) % 2 == 0 { 5.0 } else { 25.0 }).collect();
    let elec_demand: Vec<f64> = (0..n).map(|t| if t % 48 < 24 { 80.0 } else { 160.0 }).collect();

    SiteData {
        heat_demand: Series::constant(snapshots, 300.0),
        elec_demand: Series::new(snapshots.as_slice().to_vec(), elec_demand).unwrap(),
        elec_price: Series::new(snapshots.as_slice().to_vec(), elec_price).unwrap(),
        gas_price: Series::constant(snapshots, 3.0),
    }
}

#[test]
fn test_all_scenarios_build_and_validate() {
    let params = ScenarioParams::default();
    for scenario in [Scenario::One, Scenario::Two, Scenario::Three] {
        let snapshots = window(1);
        let data = synthetic_site(&snapshots);
        let network = build_scenario(scenario, snapshots, &data, &params).unwrap();
        topology::validate(&network).unwrap();
    }
}

#[test]
fn test_scenario_two_serves_all_demand() {
    let params = ScenarioParams::default();
    let snapshots = window(2);
    let data = synthetic_site(&snapshots);
    let network = build_scenario(Scenario::Two, snapshots, &data, &params).unwrap();

    let result = Dispatcher::new(&network, &params).unwrap().run().unwrap();

    assert!(
        result.total_unserved_heat() < 1e-6,
        "unserved heat {}",
        result.total_unserved_heat()
    );
    assert!(
        result.total_unserved_elec() < 1e-6,
        "unserved electricity {}",
        result.total_unserved_elec()
    );
}

#[test]
fn test_heat_books_balance_per_snapshot() {
    let params = ScenarioParams::default();
    let snapshots = window(2);
    let data = synthetic_site(&snapshots);
    let network = build_scenario(Scenario::Three, snapshots, &data, &params).unwrap();

    let result = Dispatcher::new(&network, &params).unwrap().run().unwrap();

    let n = network.snapshots().len();
    let zeroes = vec![0.0; n];
    let flow = |name: &str| result.flow(name).unwrap_or(&zeroes);

    for t in 0..n {
        let served = flow(names::BOILER)[t]
            + flow(names::CHP_HEAT)[t]
            + flow(names::HEAT_PUMP)[t]
            + flow(names::TANK_DISCHARGE)[t]
            + flow(names::SEASONAL_DISCHARGE)[t];
        let expected = data.heat_demand.values()[t] - result.unserved_heat[t];
        assert!(
            (served - expected).abs() < 1e-6,
            "heat imbalance at snapshot {t}: {served} vs {expected}"
        );
    }
}

#[test]
fn test_analysis_totals_are_consistent() {
    let params = ScenarioParams::default();
    let snapshots = window(2);
    let data = synthetic_site(&snapshots);
    let network = build_scenario(Scenario::Two, snapshots, &data, &params).unwrap();

    let result = Dispatcher::new(&network, &params).unwrap().run().unwrap();
    let summary = analyse(&network, &result).unwrap();

    assert!(summary.total_cost_pounds > 0.0);
    // Gas emissions follow the gas draw exactly.
    assert!((summary.total_emissions_kg - result.gas_burned_kwh * 0.184).abs() < 1e-6);
    assert!((summary.peak_heat_demand_kwh - 300.0).abs() < 1e-9);

    // Component totals cover every generator and link of the network.
    let names_in_summary: Vec<&str> = summary
        .component_totals
        .iter()
        .map(|t| t.component.as_str())
        .collect();
    assert!(names_in_summary.contains(&names::ELEC_MARKET));
    assert!(names_in_summary.contains(&names::BOILER));
}

#[test]
fn test_scenario_one_tank_stays_empty() {
    let params = ScenarioParams::default();
    let snapshots = window(2);
    let data = synthetic_site(&snapshots);
    let network = build_scenario(Scenario::One, snapshots, &data, &params).unwrap();

    let result = Dispatcher::new(&network, &params).unwrap().run().unwrap();

    let levels = &result.store_levels[names::TANK_STORE];
    assert!(levels.iter().all(|&l| l.abs() < 1e-9), "tank charged in scenario 1");
    assert!(result.flow(names::TANK_CHARGE).is_none());
}
