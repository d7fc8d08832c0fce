//! Network topology as a graph.
//!
//! Buses, generators, loads, and stores become petgraph nodes; links and
//! attachments become directed edges. The graph backs two operations:
//! validating that every load can actually be supplied, and rendering
//! the network as Graphviz DOT for inspection.

use std::collections::HashMap;

use petgraph::algo::has_path_connecting;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};

use easterbush_core::model::Network;

use crate::error::{NetworkError, NetworkResult};

/// Build the directed supply graph of a network.
fn build_graph(network: &Network) -> (DiGraph<String, String>, HashMap<String, NodeIndex>) {
    let mut graph = DiGraph::new();
    let mut buses: HashMap<String, NodeIndex> = HashMap::new();

    for bus in network.buses() {
        let idx = graph.add_node(format!("{} [{}]", bus.name, bus.carrier));
        buses.insert(bus.name.clone(), idx);
    }

    for link in network.links() {
        if let (Some(&from), Some(&to)) = (buses.get(&link.bus0), buses.get(&link.bus1)) {
            graph.add_edge(from, to, link.name.clone());
        }
    }

    for generator in network.generators() {
        if let Some(&bus) = buses.get(&generator.bus) {
            let idx = graph.add_node(format!("generator {}", generator.name));
            graph.add_edge(idx, bus, "supply".to_string());
        }
    }

    for load in network.loads() {
        if let Some(&bus) = buses.get(&load.bus) {
            let idx = graph.add_node(format!("load {}", load.name));
            graph.add_edge(bus, idx, "demand".to_string());
        }
    }

    for store in network.stores() {
        if let Some(&bus) = buses.get(&store.bus) {
            let idx = graph.add_node(format!("store {}", store.name));
            graph.add_edge(bus, idx, "store".to_string());
            graph.add_edge(idx, bus, "store".to_string());
        }
    }

    (graph, buses)
}

/// Check that every load bus is reachable from at least one generator
/// bus following link direction.
///
/// # Errors
/// Returns [`NetworkError::Disconnected`] naming the first unreachable
/// load.
pub fn validate(network: &Network) -> NetworkResult<()> {
    let (graph, buses) = build_graph(network);

    for load in network.loads() {
        let Some(&load_bus) = buses.get(&load.bus) else {
            continue;
        };

        let supplied = network.generators().iter().any(|generator| {
            buses
                .get(&generator.bus)
                .is_some_and(|&gen_bus| has_path_connecting(&graph, gen_bus, load_bus, None))
        });

        if !supplied {
            return Err(NetworkError::Disconnected {
                load: load.name.clone(),
                bus: load.bus.clone(),
            });
        }
    }

    Ok(())
}

/// Render the network as Graphviz DOT.
#[must_use]
pub fn to_dot(network: &Network) -> String {
    let (graph, _) = build_graph(network);
    format!("{}", Dot::new(&graph))
}

/// One-line-per-component text description.
#[must_use]
pub fn describe(network: &Network) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} buses, {} generators, {} links, {} loads, {} stores over {} snapshots\n",
        network.buses().len(),
        network.generators().len(),
        network.links().len(),
        network.loads().len(),
        network.stores().len(),
        network.snapshots().len(),
    ));
    for link in network.links() {
        out.push_str(&format!(
            "  link {}: {} -> {} (eff {:.3}, {:.0} kW)\n",
            link.name, link.bus0, link.bus1, link.efficiency, link.p_nom
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{add_boiler, add_demand, connect_elec_market};
    use easterbush_core::model::{Bus, Carrier, Load, SiteData};
    use easterbush_core::series::{Series, Snapshots};
    use chrono::{TimeZone, Utc};

    fn fixture() -> (Snapshots, SiteData) {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 1, 1, 2, 0, 0).unwrap();
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
    fn test_connected_network_validates() {
        let (snapshots, data) = fixture();
        let mut network = Network::new(snapshots);
        add_demand(&mut network, &data).unwrap();
        connect_elec_market(&mut network, &data).unwrap();
        add_boiler(&mut network, &data, &Default::default()).unwrap();

        validate(&network).unwrap();
    }

    #[test]
    fn test_orphan_load_is_disconnected() {
        let (snapshots, data) = fixture();
        let mut network = Network::new(snapshots.clone());
        add_demand(&mut network, &data).unwrap();
        connect_elec_market(&mut network, &data).unwrap();

        // A load on a bus nothing feeds.
        network
            .add_bus(Bus::new("island_bus", Carrier::Heat))
            .unwrap();
        network
            .add_load(Load::new(
                "island_load",
                "island_bus",
                Series::constant(&snapshots, 1.0),
            ))
            .unwrap();

        let result = validate(&network);
        assert!(matches!(result, Err(NetworkError::Disconnected { .. })));
    }

    #[test]
    fn test_dot_renders_components() {
        let (snapshots, data) = fixture();
        let mut network = Network::new(snapshots);
        add_demand(&mut network, &data).unwrap();
        connect_elec_market(&mut network, &data).unwrap();

        let dot = to_dot(&network);
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("elec_market_bus"));
        assert!(dot.contains("grid_import"));
    }

    #[test]
    fn test_describe_counts() {
        let (snapshots, data) = fixture();
        let mut network = Network::new(snapshots);
        add_demand(&mut network, &data).unwrap();
        connect_elec_market(&mut network, &data).unwrap();

        let text = describe(&network);
        assert!(text.contains("3 buses"));
        assert!(text.contains("1 links"));
    }
}
