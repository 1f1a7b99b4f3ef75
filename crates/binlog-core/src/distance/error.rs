use thiserror::Error;

use crate::protocol::argument::ArgumentType;
use crate::protocol::error::DecodeError;

/// A log message whose arguments do not follow the distance reading schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("distance reading needs {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },
    #[error("argument {index} ({field}) must be {expected}, got {actual}")]
    ArgumentType {
        index: usize,
        field: &'static str,
        expected: ArgumentType,
        actual: ArgumentType,
    },
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("unknown sensor: {id}")]
    UnknownSensor { id: String },
    #[error("duplicate sensor id: {id}")]
    DuplicateSensor { id: String },
    #[error("invalid distance reading: {0}")]
    Schema(#[from] SchemaError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}
