//! The multi-carrier network model.
//!
//! Components follow the bus/branch convention: buses carry a single
//! energy carrier, loads and generators attach to buses, links convert
//! energy between buses with an efficiency, and stores shift energy in
//! time on their bus.

pub mod carrier;
pub mod components;
pub mod dataset;
pub mod network;
pub mod run;
pub mod site;

pub use carrier::Carrier;
pub use components::{Bus, Generator, Link, Load, Store};
pub use dataset::{Dataset, DatasetKind};
pub use network::Network;
pub use run::{ComponentTotal, RunId, RunRecord};
pub use site::SiteData;
