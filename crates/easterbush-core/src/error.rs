use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parameter file error: {0}")]
    Params(#[from] toml::de::Error),

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("no value at {timestamp} in series {series}")]
    MissingData {
        series: String,
        timestamp: DateTime<Utc>,
    },

    #[error("duplicate {kind} named {name}")]
    Duplicate { kind: &'static str, name: String },

    #[error("{component} references unknown bus {bus}")]
    UnknownBus { component: String, bus: String },
}

pub type Result<T> = std::result::Result<T, Error>;
