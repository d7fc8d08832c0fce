//! Scenario parameters.
//!
//! Plant sizes, efficiencies, and storage-policy settings live in data so
//! scenarios can be re-run with different campus assumptions without
//! touching code. Defaults match the measured campus plant; a TOML file
//! can override any subset of fields.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use easterbush_core::params::ScenarioParams;
//!
//! let params = ScenarioParams::load(Path::new("config/params.toml")).unwrap();
//! assert!(params.boiler.efficiency > 0.9);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Specific heat capacity of water, kJ/(kg·K).
const WATER_SPECIFIC_HEAT: f64 = 4.186;

/// Top-level scenario parameter set with campus defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioParams {
    pub boiler: BoilerParams,
    pub chp: ChpParams,
    pub heat_pump: HeatPumpParams,
    pub tank_store: TankStoreParams,
    pub seasonal_store: SeasonalStoreParams,
    pub store_policy: StorePolicyParams,
}

impl ScenarioParams {
    /// Load parameters from a TOML file, falling back to defaults for any
    /// field the file omits. Unknown keys are rejected.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: Self = toml::from_str(&text)?;
        Ok(params)
    }
}

/// Gas boiler serving the heat bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoilerParams {
    /// Heat out per unit of gas in.
    pub efficiency: f64,
    /// Nominal gas draw, kW.
    pub p_nom_kw: f64,
}

impl Default for BoilerParams {
    fn default() -> Self {
        Self {
            efficiency: 0.95,
            p_nom_kw: 8000.0,
        }
    }
}

/// Combined heat and power unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChpParams {
    /// Nominal gas draw, kW.
    pub p_nom_kw: f64,
    /// Electricity out per unit of gas routed to the electric side.
    pub elec_efficiency: f64,
    /// Heat out per unit of gas routed to the heat side.
    pub heat_efficiency: f64,
    /// Minimum electricity per unit of heat produced (backpressure line).
    pub backpressure_ratio: f64,
    /// Maximum change in gas draw between snapshots, per-unit of
    /// `p_nom_kw`. The campus default is effectively unbounded.
    pub ramp_limit: f64,
}

impl Default for ChpParams {
    fn default() -> Self {
        Self {
            p_nom_kw: 1500.0,
            elec_efficiency: 0.468,
            heat_efficiency: 0.9,
            backpressure_ratio: 0.75,
            ramp_limit: 10.0,
        }
    }
}

/// Electric heat pump between the electricity and heat buses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatPumpParams {
    /// Coefficient of performance: heat out per unit of electricity in.
    pub cop: f64,
    /// Nominal electric draw, kW.
    pub p_nom_kw: f64,
}

impl Default for HeatPumpParams {
    fn default() -> Self {
        Self {
            cop: 3.0,
            p_nom_kw: 600.0,
        }
    }
}

/// Hot-water tank thermal store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TankStoreParams {
    /// Water volume, m³.
    pub volume_m3: f64,
    /// Usable temperature swing, K.
    pub delta_t_k: f64,
    /// Charge power, kW.
    pub charge_p_nom_kw: f64,
    /// Discharge power, kW.
    pub discharge_p_nom_kw: f64,
    /// Discharge cost, pence per kWh of heat delivered.
    pub discharge_cost: f64,
}

impl TankStoreParams {
    /// Usable capacity in kWh: V·ρ·c_p·ΔT / 3600.
    #[must_use]
    pub fn capacity_kwh(&self) -> f64 {
        self.volume_m3 * 1000.0 * WATER_SPECIFIC_HEAT * self.delta_t_k / 3600.0
    }
}

impl Default for TankStoreParams {
    fn default() -> Self {
        Self {
            volume_m3: 100.0,
            delta_t_k: 35.0,
            charge_p_nom_kw: 500.0,
            discharge_p_nom_kw: 500.0,
            discharge_cost: 0.1,
        }
    }
}

/// Seasonal thermal store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeasonalStoreParams {
    /// Capacity, kWh.
    pub e_nom_kwh: f64,
    /// Fraction of stored energy lost per snapshot.
    pub standing_loss: f64,
    /// Charge power, kW.
    pub charge_p_nom_kw: f64,
    /// Discharge power, kW.
    pub discharge_p_nom_kw: f64,
    /// Discharge cost, pence per kWh of heat delivered.
    pub discharge_cost: f64,
}

impl Default for SeasonalStoreParams {
    fn default() -> Self {
        Self {
            e_nom_kwh: 100_000.0,
            standing_loss: 1e-4,
            charge_p_nom_kw: 400.0,
            discharge_p_nom_kw: 400.0,
            discharge_cost: 0.1,
        }
    }
}

/// Rolling-quantile storage dispatch policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorePolicyParams {
    /// Trailing window for the tank store, in snapshots (one week at
    /// half-hourly resolution).
    pub tank_window: usize,
    /// Trailing window for the seasonal store, in snapshots (four weeks
    /// at half-hourly resolution).
    pub seasonal_window: usize,
    /// Charge when the current heat cost is at or below this quantile of
    /// the window.
    pub charge_quantile: f64,
    /// Discharge when the current heat cost is at or above this quantile.
    pub discharge_quantile: f64,
}

impl Default for StorePolicyParams {
    fn default() -> Self {
        Self {
            tank_window: 336,
            seasonal_window: 1344,
            charge_quantile: 0.25,
            discharge_quantile: 0.75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_campus_plant() {
        let params = ScenarioParams::default();
        assert!((params.boiler.efficiency - 0.95).abs() < 1e-12);
        assert!((params.boiler.p_nom_kw - 8000.0).abs() < 1e-12);
        assert!((params.chp.p_nom_kw - 1500.0).abs() < 1e-12);
        assert!((params.chp.elec_efficiency - 0.468).abs() < 1e-12);
        assert!((params.chp.backpressure_ratio - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_tank_capacity_from_volume() {
        let tank = TankStoreParams::default();
        // 100 m³ at a 35 K swing is a touch over 4 MWh.
        let capacity = tank.capacity_kwh();
        assert!(capacity > 4000.0 && capacity < 4200.0, "{capacity}");
    }

    #[test]
    fn test_partial_toml_overrides() {
        let params: ScenarioParams =
            toml::from_str("[heat_pump]\ncop = 3.5\n").unwrap();
        assert!((params.heat_pump.cop - 3.5).abs() < 1e-12);
        // Everything else keeps its default.
        assert!((params.boiler.p_nom_kw - 8000.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = toml::from_str::<ScenarioParams>("[boiler]\nefficency = 0.9\n");
        assert!(result.is_err());
    }
}
