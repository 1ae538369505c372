use thiserror::Error;

/// Failures surfaced by the command surface and the JSON API.
///
/// None of these are fatal: the engine logs the rejection, leaves its state
/// untouched and hands the error back to the caller.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid transition: cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: String },

    #[error("unit registration rejected: {0}")]
    RegistrationRejected(String),

    #[error("no free cell near ({x}, {y}) for unit {name}")]
    PlacementFailed { name: String, x: i32, y: i32 },

    #[error("invalid unit {name}: {reason}")]
    InvalidUnit { name: String, reason: String },

    #[error("unknown command token: {0}")]
    UnknownCommand(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
