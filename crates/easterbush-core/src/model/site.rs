use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::series::{Series, Snapshots};

/// The aligned input bundle a scenario needs: metered demand and market
/// prices over one clock.
///
/// Demand series are energy per snapshot (kWh); price series are pence
/// per kWh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    pub heat_demand: Series,
    pub elec_demand: Series,
    pub elec_price: Series,
    pub gas_price: Series,
}

impl SiteData {
    /// Check that every series is indexed exactly on `snapshots`.
    ///
    /// # Errors
    /// Names the first misaligned series.
    pub fn validate(&self, snapshots: &Snapshots) -> Result<()> {
        for (name, series) in [
            ("heat_demand", &self.heat_demand),
            ("elec_demand", &self.elec_demand),
            ("elec_price", &self.elec_price),
            ("gas_price", &self.gas_price),
        ] {
            if !series.is_aligned_to(snapshots) {
                return Err(Error::InvalidData(format!(
                    "site data series {name} is not aligned to the snapshots"
                )));
            }
        }
        Ok(())
    }
}
