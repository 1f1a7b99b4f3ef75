//! binlog core library for decoding framed binary log streams.
//!
//! Microcontroller firmware writes log messages as length-prefixed binary
//! frames over a serial link. This crate pulls those frames from a byte
//! source, decodes the fixed header and the type-tagged arguments, and hands
//! typed messages to consumers: a log line formatter and a distance sensor
//! telemetry tracker. Parsing is byte-oriented and side-effect free; all I/O
//! is isolated in `source`.
//!
//! Invariants:
//! - Frames are decoded strictly in arrival order, one per pull.
//! - Clean end of stream only happens before the first byte of a frame.
//! - Every short read is `TruncatedFrame`; nothing is skipped or resynced.
//!
//! Version française (résumé):
//! Cette crate décode un flux de journaux binaires (trames préfixées par leur
//! longueur) : source d'octets -> trames -> messages typés -> formatage ou
//! suivi des capteurs de distance. Aucune resynchronisation après une erreur.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use binlog_core::{MessageDecoder, ReaderSource, format_line};
//!
//! let source = ReaderSource::open(Path::new("capture.bin"))?;
//! for message in MessageDecoder::new(source) {
//!     println!("{}", format_line(&message?));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod decoder;
mod distance;
mod format;
mod protocol;
mod source;

pub use config::{ConfigError, SessionConfig, load_config};
pub use decoder::{DecoderState, MessageDecoder};
pub use distance::{
    DEFAULT_SENSORS, DistanceReading, SchemaError, SensorState, Tracker, TrackerError,
    collect_readings, to_distance_reading,
};
pub use format::{format_hex_byte, format_line, format_timestamp};
pub use protocol::{
    Argument, ArgumentType, DecodeError, EncodeError, LogMessage, LpString, ParsedMessage,
    Severity, decode_argument, decode_message, encode_frame, encode_payload, next_frame_payload,
    parse_message,
};
pub use source::{ByteSource, CancelToken, ReaderSource, SourceError, open_input};
