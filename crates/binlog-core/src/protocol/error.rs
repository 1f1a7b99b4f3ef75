use thiserror::Error;

use crate::source::SourceError;

/// Errors returned while pulling frames and decoding log messages.
///
/// All variants are fatal to the current stream: the wire format carries no
/// resynchronization marker, so the decoder never skips ahead.
///
/// # Examples
/// ```
/// use binlog_core::DecodeError;
///
/// let err = DecodeError::UnknownSeverity { value: 9 };
/// assert!(err.to_string().contains("unknown severity"));
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("truncated frame: need {needed} bytes, got {actual}")]
    TruncatedFrame { needed: usize, actual: usize },
    #[error("unknown severity: {value}")]
    UnknownSeverity { value: u8 },
    #[error("unknown argument type: {tag}")]
    UnknownArgumentType { tag: u8 },
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("decoder already failed; no further frames are read")]
    Terminated,
}

/// Errors returned when a message cannot be represented on the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("string too long: {len} bytes, max {max}")]
    StringTooLong { len: usize, max: usize },
    #[error("too many arguments: {count}, max {max}")]
    TooManyArguments { count: usize, max: usize },
    #[error("payload too large: {len} bytes, max {max}")]
    PayloadTooLarge { len: usize, max: usize },
}
