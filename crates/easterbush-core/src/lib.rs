//! Core domain model for easter-bush-energy.
//!
//! This crate defines the time-series primitives (`Snapshots`, `Series`),
//! the multi-carrier network model (buses, generators, links, loads,
//! stores), scenario parameters, and the SQLite schema for dataset
//! registry and simulation-run history.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod params;
pub mod schema;
pub mod series;

pub use error::{Error, Result};
