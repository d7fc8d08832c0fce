//! Campus scenarios.
//!
//! Three plant configurations are studied against the same metered
//! demand, differing in how much flexible heat plant backs up the CHP
//! and boiler.

use easterbush_core::model::{Network, SiteData};
use easterbush_core::params::ScenarioParams;
use easterbush_core::series::Snapshots;

use crate::builder::{
    add_boiler, add_chp, add_demand, add_heat_pump_and_tank, add_seasonal_store,
    connect_elec_market,
};
use crate::error::NetworkResult;

/// One of the studied plant configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// CHP, boiler, and market with the tank installed but uncharged:
    /// the baseline the storage scenarios are compared against. Runs on
    /// a flat electricity price.
    One,
    /// Adds the heat pump and lets it work the tank store.
    Two,
    /// Adds the seasonal store on top of scenario two.
    Three,
}

impl Scenario {
    #[must_use]
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Scenario one isolates plant behavior from tariff volatility by
    /// flattening the electricity price to its window mean.
    #[must_use]
    pub const fn uses_static_elec_price(self) -> bool {
        matches!(self, Self::One)
    }

    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::One => "CHP + boiler + market, tank present but uncharged",
            Self::Two => "CHP + boiler + market + heat pump with tank store",
            Self::Three => "scenario two plus seasonal thermal store",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scenario {}", self.number())
    }
}

/// Assemble the network for a scenario over the given window.
pub fn build_scenario(
    scenario: Scenario,
    snapshots: Snapshots,
    data: &SiteData,
    params: &ScenarioParams,
) -> NetworkResult<Network> {
    let mut network = Network::new(snapshots);

    add_demand(&mut network, data)?;
    connect_elec_market(&mut network, data)?;
    add_boiler(&mut network, data, &params.boiler)?;
    add_chp(&mut network, data, &params.chp)?;

    match scenario {
        Scenario::One => {
            add_heat_pump_and_tank(
                &mut network,
                &params.heat_pump,
                &params.tank_store,
                Some(0.0),
            )?;
        }
        Scenario::Two => {
            add_heat_pump_and_tank(&mut network, &params.heat_pump, &params.tank_store, None)?;
        }
        Scenario::Three => {
            add_heat_pump_and_tank(&mut network, &params.heat_pump, &params.tank_store, None)?;
            add_seasonal_store(&mut network, &params.heat_pump, &params.seasonal_store)?;
        }
    }

    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::names;
    use easterbush_core::series::Series;
    use chrono::{TimeZone, Utc};

    fn fixture() -> (Snapshots, SiteData) {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 1, 1, 4, 0, 0).unwrap();
        let snapshots = Snapshots::half_hourly(start, end).unwrap();
        let data = SiteData {
            heat_demand: Series::constant(&snapshots, 100.0),
            elec_demand: Series::constant(&snapshots, 40.0),
            elec_price: Series::constant(&snapshots, 14.0),
            gas_price: Series::constant(&snapshots, 3.5),
        };
        (snapshots, data)
    }

    #[test]
    fn test_scenario_numbers_round_trip() {
        for n in 1..=3 {
            assert_eq!(Scenario::from_number(n).unwrap().number(), n);
        }
        assert!(Scenario::from_number(4).is_none());
    }

    #[test]
    fn test_only_scenario_one_flattens_prices() {
        assert!(Scenario::One.uses_static_elec_price());
        assert!(!Scenario::Two.uses_static_elec_price());
        assert!(!Scenario::Three.uses_static_elec_price());
    }

    #[test]
    fn test_scenario_one_has_uncharged_tank() {
        let (snapshots, data) = fixture();
        let params = ScenarioParams::default();
        let network = build_scenario(Scenario::One, snapshots, &data, &params).unwrap();

        assert!(network.store(names::TANK_STORE).is_some());
        assert_eq!(network.link(names::TANK_CHARGE).unwrap().p_nom, 0.0);
        assert!(network.store(names::SEASONAL_STORE).is_none());
    }

    #[test]
    fn test_scenario_two_enables_heat_pump() {
        let (snapshots, data) = fixture();
        let params = ScenarioParams::default();
        let network = build_scenario(Scenario::Two, snapshots, &data, &params).unwrap();

        assert!(network.link(names::HEAT_PUMP).unwrap().p_nom > 0.0);
        assert!(network.store(names::SEASONAL_STORE).is_none());
    }

    #[test]
    fn test_scenario_three_adds_seasonal_store() {
        let (snapshots, data) = fixture();
        let params = ScenarioParams::default();
        let network = build_scenario(Scenario::Three, snapshots, &data, &params).unwrap();

        assert!(network.store(names::SEASONAL_STORE).is_some());
        assert!(network.link(names::SEASONAL_DISCHARGE).is_some());
    }
}
