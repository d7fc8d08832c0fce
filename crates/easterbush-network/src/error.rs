use thiserror::Error;

/// Errors from network assembly, validation, and dispatch.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// An error propagated from the core domain layer.
    #[error("core error: {0}")]
    Core(#[from] easterbush_core::Error),

    /// A component the dispatch engine needs is not in the network.
    #[error("network has no {kind} named {name}")]
    MissingComponent { kind: &'static str, name: String },

    /// A load cannot be reached from any generator.
    #[error("load {load} on bus {bus} is unreachable from every generator")]
    Disconnected { load: String, bus: String },

    /// The network or its inputs are inconsistent.
    #[error("invalid network: {0}")]
    Invalid(String),
}

pub type NetworkResult<T> = std::result::Result<T, NetworkError>;
