//! Assembling the campus network.
//!
//! Each function adds one piece of plant to a [`Network`], mirroring how
//! the campus is actually wired: metered loads, a one-way grid
//! connection, a gas boiler, the CHP unit, and heat pumps feeding
//! thermal stores. Component names are fixed so the dispatch engine and
//! reports can find each role.

use easterbush_core::model::{Bus, Carrier, Generator, Link, Load, Network, SiteData, Store};
use easterbush_core::params::{
    BoilerParams, ChpParams, HeatPumpParams, SeasonalStoreParams, TankStoreParams,
};

use crate::error::NetworkResult;

/// Fixed component names for the campus plant roles.
pub mod names {
    pub const HEAT_LOAD_BUS: &str = "heat_load_bus";
    pub const ELEC_LOAD_BUS: &str = "elec_load_bus";
    pub const ELEC_MARKET_BUS: &str = "elec_market_bus";
    pub const GAS_BOILER_BUS: &str = "gas_boiler_bus";
    pub const GAS_CHP_BUS: &str = "gas_chp_bus";
    pub const TANK_BUS: &str = "tank_bus";
    pub const SEASONAL_BUS: &str = "seasonal_bus";

    pub const HEAT_LOAD: &str = "heat_load";
    pub const ELEC_LOAD: &str = "elec_load";

    pub const ELEC_MARKET: &str = "elec_market";
    pub const GAS_BOILER_SUPPLY: &str = "gas_boiler_supply";
    pub const GAS_CHP_SUPPLY: &str = "gas_chp_supply";

    pub const GRID_IMPORT: &str = "grid_import";
    pub const BOILER: &str = "boiler";
    pub const CHP_HEAT: &str = "chp_heat";
    pub const CHP_ELEC: &str = "chp_elec";
    pub const HEAT_PUMP: &str = "heat_pump";

    pub const TANK_STORE: &str = "tank_store";
    pub const TANK_CHARGE: &str = "tank_charge";
    pub const TANK_DISCHARGE: &str = "tank_discharge";
    pub const SEASONAL_STORE: &str = "seasonal_store";
    pub const SEASONAL_CHARGE: &str = "seasonal_charge";
    pub const SEASONAL_DISCHARGE: &str = "seasonal_discharge";
}

/// Add the heat and electricity load buses and the metered demand.
pub fn add_demand(network: &mut Network, data: &SiteData) -> NetworkResult<()> {
    network.add_bus(Bus::new(names::HEAT_LOAD_BUS, Carrier::Heat))?;
    network.add_bus(Bus::new(names::ELEC_LOAD_BUS, Carrier::Electricity))?;

    network.add_load(Load::new(
        names::HEAT_LOAD,
        names::HEAT_LOAD_BUS,
        data.heat_demand.clone(),
    ))?;
    network.add_load(Load::new(
        names::ELEC_LOAD,
        names::ELEC_LOAD_BUS,
        data.elec_demand.clone(),
    ))?;

    Ok(())
}

/// Add the wholesale electricity market and its import connection,
/// sized to the peak metered demand.
pub fn connect_elec_market(network: &mut Network, data: &SiteData) -> NetworkResult<()> {
    let step_hours = network.snapshots().step_hours();
    let peak_kw = data.elec_demand.max()? / step_hours;

    network.add_bus(Bus::new(names::ELEC_MARKET_BUS, Carrier::Electricity))?;
    network.add_generator(Generator::new(
        names::ELEC_MARKET,
        names::ELEC_MARKET_BUS,
        data.elec_price.clone(),
        peak_kw,
    ))?;
    network.add_link(Link::new(
        names::GRID_IMPORT,
        names::ELEC_MARKET_BUS,
        names::ELEC_LOAD_BUS,
        peak_kw,
    ))?;

    Ok(())
}

/// Add the gas boiler: a dedicated gas supply bus and a conversion link
/// into the heat bus.
pub fn add_boiler(
    network: &mut Network,
    data: &SiteData,
    params: &BoilerParams,
) -> NetworkResult<()> {
    network.add_bus(Bus::new(names::GAS_BOILER_BUS, Carrier::Gas))?;
    network.add_generator(Generator::new(
        names::GAS_BOILER_SUPPLY,
        names::GAS_BOILER_BUS,
        data.gas_price.clone(),
        params.p_nom_kw,
    ))?;
    network.add_link(
        Link::new(
            names::BOILER,
            names::GAS_BOILER_BUS,
            names::HEAT_LOAD_BUS,
            params.p_nom_kw,
        )
        .with_efficiency(params.efficiency),
    )?;

    Ok(())
}

/// Add the CHP unit: a ramp-limited gas supply with heat and electric
/// output links.
pub fn add_chp(network: &mut Network, data: &SiteData, params: &ChpParams) -> NetworkResult<()> {
    network.add_bus(Bus::new(names::GAS_CHP_BUS, Carrier::Gas))?;
    network.add_generator(
        Generator::new(
            names::GAS_CHP_SUPPLY,
            names::GAS_CHP_BUS,
            data.gas_price.clone(),
            params.p_nom_kw,
        )
        .with_ramp_limit(params.ramp_limit),
    )?;
    network.add_link(
        Link::new(
            names::CHP_HEAT,
            names::GAS_CHP_BUS,
            names::HEAT_LOAD_BUS,
            params.p_nom_kw,
        )
        .with_efficiency(params.heat_efficiency),
    )?;
    network.add_link(
        Link::new(
            names::CHP_ELEC,
            names::GAS_CHP_BUS,
            names::ELEC_LOAD_BUS,
            params.p_nom_kw,
        )
        .with_efficiency(params.elec_efficiency),
    )?;

    Ok(())
}

/// Add the heat pump and the hot-water tank store it charges.
///
/// `hp_p_nom_override` caps both the direct heat pump and the tank
/// charger; passing `Some(0.0)` installs the tank without any way to
/// charge it, which one scenario uses as a baseline.
pub fn add_heat_pump_and_tank(
    network: &mut Network,
    hp: &HeatPumpParams,
    tank: &TankStoreParams,
    hp_p_nom_override: Option<f64>,
) -> NetworkResult<()> {
    let hp_p_nom = hp_p_nom_override.unwrap_or(hp.p_nom_kw);
    let charge_p_nom = hp_p_nom_override.unwrap_or(tank.charge_p_nom_kw);

    network.add_link(
        Link::new(
            names::HEAT_PUMP,
            names::ELEC_LOAD_BUS,
            names::HEAT_LOAD_BUS,
            hp_p_nom,
        )
        .with_efficiency(hp.cop),
    )?;

    network.add_bus(Bus::new(names::TANK_BUS, Carrier::Heat))?;
    network.add_store(Store::new(
        names::TANK_STORE,
        names::TANK_BUS,
        tank.capacity_kwh(),
    ))?;
    network.add_link(
        Link::new(
            names::TANK_CHARGE,
            names::ELEC_LOAD_BUS,
            names::TANK_BUS,
            charge_p_nom,
        )
        .with_efficiency(hp.cop),
    )?;
    network.add_link(
        Link::new(
            names::TANK_DISCHARGE,
            names::TANK_BUS,
            names::HEAT_LOAD_BUS,
            tank.discharge_p_nom_kw,
        )
        .with_marginal_cost(tank.discharge_cost),
    )?;

    Ok(())
}

/// Add the seasonal thermal store, charged through a heat pump.
pub fn add_seasonal_store(
    network: &mut Network,
    hp: &HeatPumpParams,
    params: &SeasonalStoreParams,
) -> NetworkResult<()> {
    network.add_bus(Bus::new(names::SEASONAL_BUS, Carrier::Heat))?;
    network.add_store(
        Store::new(names::SEASONAL_STORE, names::SEASONAL_BUS, params.e_nom_kwh)
            .with_standing_loss(params.standing_loss),
    )?;
    network.add_link(
        Link::new(
            names::SEASONAL_CHARGE,
            names::ELEC_LOAD_BUS,
            names::SEASONAL_BUS,
            params.charge_p_nom_kw,
        )
        .with_efficiency(hp.cop),
    )?;
    network.add_link(
        Link::new(
            names::SEASONAL_DISCHARGE,
            names::SEASONAL_BUS,
            names::HEAT_LOAD_BUS,
            params.discharge_p_nom_kw,
        )
        .with_marginal_cost(params.discharge_cost),
    )?;

    Ok(())
}
