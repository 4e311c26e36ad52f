use crate::types::{PassengerId, StationId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {field} {reason}")]
    Configuration { field: &'static str, reason: String },

    #[error(
        "Passenger {passenger_id}: {field} station {station} outside 1..={num_stations}"
    )]
    OutOfRangeReference {
        passenger_id: PassengerId,
        field:        &'static str,
        station:      StationId,
        num_stations: StationId,
    },

    #[error("Passenger id {passenger_id} appears more than once")]
    DuplicatePassenger { passenger_id: PassengerId },

    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
