use serde::{Deserialize, Serialize};

use crate::model::carrier::Carrier;
use crate::series::Series;

/// A node of the network carrying a single energy carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub name: String,
    pub carrier: Carrier,
}

impl Bus {
    #[must_use]
    pub fn new(name: impl Into<String>, carrier: Carrier) -> Self {
        Self {
            name: name.into(),
            carrier,
        }
    }
}

/// Metered demand attached to a bus.
///
/// The demand series carries energy per snapshot (kWh) and must be aligned
/// to the network clock before the network accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub name: String,
    pub bus: String,
    pub demand: Series,
}

impl Load {
    #[must_use]
    pub fn new(name: impl Into<String>, bus: impl Into<String>, demand: Series) -> Self {
        Self {
            name: name.into(),
            bus: bus.into(),
            demand,
        }
    }
}

/// A priced source of primary energy (a market connection or a fuel
/// supply) feeding a bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub name: String,
    pub bus: String,
    /// Marginal cost per kWh drawn, in pence, per snapshot.
    pub marginal_cost: Series,
    /// Nominal power in kW.
    pub p_nom: f64,
    /// Maximum change in draw between snapshots, per-unit of `p_nom`.
    pub ramp_limit: Option<f64>,
}

impl Generator {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        bus: impl Into<String>,
        marginal_cost: Series,
        p_nom: f64,
    ) -> Self {
        Self {
            name: name.into(),
            bus: bus.into(),
            marginal_cost,
            p_nom,
            ramp_limit: None,
        }
    }

    #[must_use]
    pub fn with_ramp_limit(mut self, limit: f64) -> Self {
        self.ramp_limit = Some(limit);
        self
    }
}

/// A one-directional converter between two buses (market import, boiler,
/// CHP output, heat pump, store charge/discharge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub bus0: String,
    pub bus1: String,
    /// Output energy per unit of input energy.
    pub efficiency: f64,
    /// Nominal input power in kW.
    pub p_nom: f64,
    /// Cost per kWh of output, in pence, on top of the input's cost.
    pub marginal_cost: f64,
}

impl Link {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        bus0: impl Into<String>,
        bus1: impl Into<String>,
        p_nom: f64,
    ) -> Self {
        Self {
            name: name.into(),
            bus0: bus0.into(),
            bus1: bus1.into(),
            efficiency: 1.0,
            p_nom,
            marginal_cost: 0.0,
        }
    }

    #[must_use]
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    #[must_use]
    pub fn with_marginal_cost(mut self, cost: f64) -> Self {
        self.marginal_cost = cost;
        self
    }
}

/// An energy store attached to a bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    pub bus: String,
    /// Capacity in kWh.
    pub e_nom: f64,
    /// Level at the first snapshot, kWh.
    pub e_initial: f64,
    /// Fraction of the stored energy lost per snapshot.
    pub standing_loss: f64,
}

impl Store {
    #[must_use]
    pub fn new(name: impl Into<String>, bus: impl Into<String>, e_nom: f64) -> Self {
        Self {
            name: name.into(),
            bus: bus.into(),
            e_nom,
            e_initial: 0.0,
            standing_loss: 0.0,
        }
    }

    #[must_use]
    pub fn with_e_initial(mut self, e_initial: f64) -> Self {
        self.e_initial = e_initial;
        self
    }

    #[must_use]
    pub fn with_standing_loss(mut self, loss: f64) -> Self {
        self.standing_loss = loss;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{Series, Snapshots};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_link_builder() {
        let link = Link::new("boiler", "gas_bus", "heat_bus", 8000.0)
            .with_efficiency(0.95)
            .with_marginal_cost(0.1);
        assert_eq!(link.bus0, "gas_bus");
        assert!((link.efficiency - 0.95).abs() < 1e-12);
        assert!((link.marginal_cost - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_generator_ramp_default_unbounded() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let snaps = Snapshots::half_hourly(start, start).unwrap();
        let generator = Generator::new("grid", "grid_bus", Series::constant(&snaps, 12.0), 500.0);
        assert!(generator.ramp_limit.is_none());

        let ramped = generator.with_ramp_limit(10.0);
        assert_eq!(ramped.ramp_limit, Some(10.0));
    }

    #[test]
    fn test_store_builder() {
        let store = Store::new("tank", "tank_bus", 4070.0)
            .with_e_initial(100.0)
            .with_standing_loss(1e-4);
        assert!((store.e_initial - 100.0).abs() < 1e-12);
        assert!((store.standing_loss - 1e-4).abs() < 1e-12);
    }
}
