//! Network modeling and dispatch for easter-bush-energy.
//!
//! Builds the campus energy network (demand, grid connection, boiler,
//! CHP, heat pumps, thermal stores) over the core model, validates its
//! topology, and runs the merit-order dispatch engine over a time
//! window.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod analysis;
pub mod builder;
pub mod chp;
pub mod dispatch;
pub mod error;
pub mod scenario;
pub mod topology;

pub use analysis::{analyse, render_report, RunSummary};
pub use builder::names;
pub use dispatch::{DispatchResult, Dispatcher};
pub use error::{NetworkError, NetworkResult};
pub use scenario::{build_scenario, Scenario};
