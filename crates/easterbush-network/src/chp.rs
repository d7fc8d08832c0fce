//! Combined heat and power operating envelope.
//!
//! The unit burns gas and routes it between a heat side and an electric
//! side. Operation is constrained by the backpressure line (producing
//! heat forces a minimum electric output), the shared gas capacity, and
//! a ramp limit on how fast the gas draw may rise between snapshots.
//! Exceeding campus electricity demand is not allowed: the market
//! connection is import-only, so byproduct electricity must be
//! absorbable on site.

use easterbush_core::params::ChpParams;

/// The CHP unit's operating rules over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ChpUnit {
    /// Nominal gas draw, kW.
    pub p_nom_kw: f64,
    /// Electricity out per unit of gas routed to the electric side.
    pub elec_efficiency: f64,
    /// Heat out per unit of gas routed to the heat side.
    pub heat_efficiency: f64,
    /// Minimum electricity per unit of heat produced.
    pub backpressure_ratio: f64,
    /// Maximum rise in gas draw between snapshots, per-unit of nominal.
    pub ramp_limit: f64,
}

impl From<&ChpParams> for ChpUnit {
    fn from(params: &ChpParams) -> Self {
        Self {
            p_nom_kw: params.p_nom_kw,
            elec_efficiency: params.elec_efficiency,
            heat_efficiency: params.heat_efficiency,
            backpressure_ratio: params.backpressure_ratio,
            ramp_limit: params.ramp_limit,
        }
    }
}

impl ChpUnit {
    /// Gas energy available this snapshot (kWh), given the previous
    /// snapshot's draw and the snapshot length in hours.
    #[must_use]
    pub fn gas_cap_kwh(&self, prev_gas_kwh: f64, step_hours: f64) -> f64 {
        let nominal = self.p_nom_kw * step_hours;
        let ramped = prev_gas_kwh + self.ramp_limit * nominal;
        nominal.min(ramped)
    }

    /// Gas needed to produce `heat_kwh` plus its mandatory backpressure
    /// electricity.
    #[must_use]
    pub fn gas_for_heat_kwh(&self, heat_kwh: f64) -> f64 {
        heat_kwh / self.heat_efficiency
            + self.backpressure_ratio * heat_kwh / self.elec_efficiency
    }

    /// Electricity that producing `heat_kwh` forces out.
    #[must_use]
    pub fn forced_elec_kwh(&self, heat_kwh: f64) -> f64 {
        self.backpressure_ratio * heat_kwh
    }

    /// Largest heat output (kWh) that fits the gas cap and whose forced
    /// electricity fits the remaining on-site demand.
    #[must_use]
    pub fn max_heat_kwh(&self, gas_cap_kwh: f64, elec_room_kwh: f64) -> f64 {
        let gas_per_heat =
            1.0 / self.heat_efficiency + self.backpressure_ratio / self.elec_efficiency;
        let by_gas = gas_cap_kwh / gas_per_heat;
        let by_elec = if self.backpressure_ratio > 0.0 {
            elec_room_kwh / self.backpressure_ratio
        } else {
            f64::INFINITY
        };
        by_gas.min(by_elec).max(0.0)
    }

    /// Net cost of one kWh of CHP heat, in pence: the gas for heat and
    /// forced electricity, less the grid purchases that electricity
    /// displaces. Can go negative when electricity is expensive.
    #[must_use]
    pub fn heat_cost(&self, gas_price: f64, elec_price: f64) -> f64 {
        self.gas_for_heat_kwh(1.0) * gas_price - self.backpressure_ratio * elec_price
    }

    /// Cost of one kWh of discretionary (beyond-backpressure) CHP
    /// electricity, in pence.
    #[must_use]
    pub fn elec_cost(&self, gas_price: f64) -> f64 {
        gas_price / self.elec_efficiency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campus_chp() -> ChpUnit {
        ChpUnit::from(&ChpParams::default())
    }

    #[test]
    fn test_gas_cap_respects_nominal() {
        let chp = campus_chp();
        // Plenty of prior draw: the nominal bound wins.
        let cap = chp.gas_cap_kwh(10_000.0, 0.5);
        assert!((cap - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_gas_cap_respects_ramp() {
        let chp = ChpUnit {
            ramp_limit: 0.1,
            ..campus_chp()
        };
        // Cold start: only one ramp step of gas is available.
        let cap = chp.gas_cap_kwh(0.0, 0.5);
        assert!((cap - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_forced_elec_tracks_backpressure() {
        let chp = campus_chp();
        assert!((chp.forced_elec_kwh(100.0) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_heat_limited_by_elec_room() {
        let chp = campus_chp();
        // Gas is ample; 30 kWh of electric room caps heat at 40 kWh.
        let max = chp.max_heat_kwh(10_000.0, 30.0);
        assert!((max - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_heat_limited_by_gas() {
        let chp = campus_chp();
        let gas_per_heat = 1.0 / 0.9 + 0.75 / 0.468;
        let max = chp.max_heat_kwh(100.0, 1e9);
        assert!((max - 100.0 / gas_per_heat).abs() < 1e-9);
    }

    #[test]
    fn test_heat_and_forced_elec_fit_gas_budget() {
        let chp = campus_chp();
        let heat = chp.max_heat_kwh(100.0, 1e9);
        assert!(chp.gas_for_heat_kwh(heat) <= 100.0 + 1e-9);
    }

    #[test]
    fn test_heat_cost_credits_electricity() {
        let chp = campus_chp();
        let cheap_elec = chp.heat_cost(3.0, 1.0);
        let dear_elec = chp.heat_cost(3.0, 20.0);
        assert!(dear_elec < cheap_elec);
    }

    #[test]
    fn test_elec_cost() {
        let chp = campus_chp();
        assert!((chp.elec_cost(4.68) - 10.0).abs() < 1e-9);
    }
}
