use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Invalid kind: transition keys must be non-empty")]
    InvalidKind,

    #[error("Invalid handler map entry '{key}': {reason}")]
    InvalidHandlerMap { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CompileError>;
