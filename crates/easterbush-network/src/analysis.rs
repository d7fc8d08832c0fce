//! Run analysis.
//!
//! Turns raw dispatch flows into per-component energy and operating
//! cost, site emissions, and a text report. Prices are pence per kWh
//! throughout, so totals divide by 100 into pounds.

use std::collections::BTreeMap;

use easterbush_core::model::{Carrier, ComponentTotal, Network, RunRecord};
use easterbush_core::series::Snapshots;

use crate::dispatch::DispatchResult;
use crate::error::{NetworkError, NetworkResult};

/// Summary of one dispatch run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Delivered energy and cost per component, generators first.
    pub component_totals: Vec<ComponentTotal>,
    pub total_cost_pounds: f64,
    /// Site CO2 from gas burned, kg.
    pub total_emissions_kg: f64,
    pub unserved_heat_kwh: f64,
    pub unserved_elec_kwh: f64,
    /// Largest heat demand in any snapshot, kWh.
    pub peak_heat_demand_kwh: f64,
    /// Largest electricity demand in any snapshot, kWh.
    pub peak_elec_demand_kwh: f64,
    /// Full cycles per store: total discharge over capacity.
    pub store_cycles: BTreeMap<String, f64>,
}

impl RunSummary {
    /// Fold the summary into a persistable run record.
    #[must_use]
    pub fn to_run_record(&self, scenario: u8, snapshots: &Snapshots) -> RunRecord {
        let mut record = RunRecord::new(
            scenario,
            snapshots.first().unwrap_or_default(),
            snapshots.last().unwrap_or_default(),
            snapshots.step().num_minutes(),
        );
        record.total_cost_pounds = self.total_cost_pounds;
        record.total_emissions_kg = self.total_emissions_kg;
        record.unserved_heat_kwh = self.unserved_heat_kwh;
        record.unserved_elec_kwh = self.unserved_elec_kwh;
        record
    }
}

/// Summarise a dispatch run against the network that produced it.
///
/// Generator cost is flow × marginal price per snapshot; link cost is
/// its flat marginal cost on delivered energy. Emissions come from
/// generators sitting on gas buses.
pub fn analyse(network: &Network, result: &DispatchResult) -> NetworkResult<RunSummary> {
    let n = network.snapshots().len();
    let zeroes = vec![0.0; n];

    let mut component_totals = Vec::new();
    let mut total_cost_pence = 0.0;
    let mut total_emissions = 0.0;

    for generator in network.generators() {
        let flow = result.flow(&generator.name).unwrap_or(&zeroes);
        let energy: f64 = flow.iter().sum();
        let cost_pence: f64 = flow
            .iter()
            .zip(generator.marginal_cost.values())
            .map(|(f, p)| f * p)
            .sum();

        let carrier = network
            .bus(&generator.bus)
            .map(|b| b.carrier)
            .ok_or_else(|| {
                NetworkError::Invalid(format!("generator {} on unknown bus", generator.name))
            })?;
        total_emissions += energy * carrier.co2_kg_per_kwh();
        total_cost_pence += cost_pence;

        component_totals.push(ComponentTotal {
            component: generator.name.clone(),
            carrier: carrier.as_str().to_string(),
            energy_kwh: energy,
            cost_pounds: cost_pence * 0.01,
        });
    }

    for link in network.links() {
        let flow = result.flow(&link.name).unwrap_or(&zeroes);
        let energy: f64 = flow.iter().sum();
        let cost_pence = energy * link.marginal_cost;
        total_cost_pence += cost_pence;

        let carrier = network
            .bus(&link.bus1)
            .map_or(Carrier::Heat, |b| b.carrier);
        component_totals.push(ComponentTotal {
            component: link.name.clone(),
            carrier: carrier.as_str().to_string(),
            energy_kwh: energy,
            cost_pounds: cost_pence * 0.01,
        });
    }

    let mut store_cycles = BTreeMap::new();
    for store in network.stores() {
        if store.e_nom <= 0.0 {
            continue;
        }
        let discharged: f64 = network
            .links()
            .iter()
            .filter(|l| l.bus0 == store.bus)
            .filter_map(|l| result.flow(&l.name))
            .map(|flow| flow.iter().sum::<f64>())
            .sum();
        store_cycles.insert(store.name.clone(), discharged / store.e_nom);
    }

    let peak = |name: &str| {
        network
            .load(name)
            .and_then(|l| l.demand.max().ok())
            .unwrap_or(0.0)
    };

    Ok(RunSummary {
        component_totals,
        total_cost_pounds: total_cost_pence * 0.01,
        total_emissions_kg: total_emissions,
        unserved_heat_kwh: result.total_unserved_heat(),
        unserved_elec_kwh: result.total_unserved_elec(),
        peak_heat_demand_kwh: peak(crate::builder::names::HEAT_LOAD),
        peak_elec_demand_kwh: peak(crate::builder::names::ELEC_LOAD),
        store_cycles,
    })
}

/// Render a summary as the operator-facing text report.
#[must_use]
pub fn render_report(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("\n⚡ Dispatch Summary\n\n");

    out.push_str("  Operating cost by component:\n");
    let mut rows: Vec<&ComponentTotal> = summary.component_totals.iter().collect();
    rows.sort_by(|a, b| b.energy_kwh.total_cmp(&a.energy_kwh));
    for total in rows {
        out.push_str(&format!(
            "    {:<22} {:<12} {:>12.1} kWh  £{:>10.2}\n",
            total.component, total.carrier, total.energy_kwh, total.cost_pounds
        ));
    }

    out.push_str(&format!(
        "\n  Peak heat demand:        {:.1} kWh per snapshot\n",
        summary.peak_heat_demand_kwh
    ));
    out.push_str(&format!(
        "  Peak electricity demand: {:.1} kWh per snapshot\n",
        summary.peak_elec_demand_kwh
    ));

    for (store, cycles) in &summary.store_cycles {
        out.push_str(&format!("  Store cycles ({store}): {cycles:.2}\n"));
    }

    if summary.unserved_heat_kwh > 0.0 || summary.unserved_elec_kwh > 0.0 {
        out.push_str(&format!(
            "\n  ⚠ Unserved demand: {:.1} kWh heat, {:.1} kWh electricity\n",
            summary.unserved_heat_kwh, summary.unserved_elec_kwh
        ));
    }

    out.push_str(&format!(
        "\n  Total emission by gas: approx {} kg\n",
        summary.total_emissions_kg.round()
    ));
    out.push_str(&format!(
        "  Grand total operating cost: {} Pound\n",
        summary.total_cost_pounds.round()
    ));

    out
}
