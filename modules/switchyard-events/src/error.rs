use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Invalid kind: event kinds must be non-empty")]
    InvalidKind,

    #[error("Accessor collision: '{first}' and '{second}' both map to '{accessor}'")]
    AccessorCollision {
        accessor: String,
        first: String,
        second: String,
    },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EventError>;
