use std::fmt;

use serde::Serialize;

use super::argument::{Argument, LpString, decode_argument};
use super::error::DecodeError;
use super::layout;
use super::reader::PayloadReader;

/// Message importance level; a closed set on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Fatal,
    Info,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Fatal => "FATAL",
            Severity::Info => "INFO",
        }
    }

    /// First character of the severity name, as used in log lines.
    pub fn initial(self) -> char {
        match self {
            Severity::Fatal => 'F',
            Severity::Info => 'I',
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Severity::Fatal => layout::SEVERITY_FATAL,
            Severity::Info => layout::SEVERITY_INFO,
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            layout::SEVERITY_FATAL => Ok(Severity::Fatal),
            layout::SEVERITY_INFO => Ok(Severity::Info),
            other => Err(DecodeError::UnknownSeverity { value: other }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded log record.
///
/// # Examples
/// ```
/// use binlog_core::{Argument, LogMessage, Severity};
///
/// let msg = LogMessage {
///     severity: Severity::Info,
///     micros: 1_234_567,
///     file_name: "a.c".into(),
///     line_number: 10,
///     args: vec![Argument::UInt8(5)],
/// };
/// assert_eq!(msg.args.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMessage {
    pub severity: Severity,
    /// Device-local microsecond counter; wraps at 2^32.
    pub micros: u32,
    pub file_name: LpString,
    pub line_number: u16,
    pub args: Vec<Argument>,
}

/// A decoded message together with the number of payload bytes left over
/// after the last declared argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub message: LogMessage,
    pub trailing_bytes: usize,
}

/// Parses a frame payload into a message, reporting unconsumed trailing bytes.
///
/// # Errors
/// `TruncatedFrame` when the header or any argument runs past the payload,
/// `UnknownSeverity` or `UnknownArgumentType` for unmapped bytes.
pub fn parse_message(payload: &[u8]) -> Result<ParsedMessage, DecodeError> {
    let header = parse_header(payload)?;
    let mut offset = header.args_offset;
    let mut args = Vec::with_capacity(header.num_args as usize);
    for _ in 0..header.num_args {
        let (arg, consumed) = decode_argument(payload, offset)?;
        args.push(arg);
        offset += consumed;
    }
    Ok(header.finish(args, payload.len() - offset))
}

/// Fixed header fields, parsed ahead of the argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub severity: Severity,
    pub micros: u32,
    pub file_name: LpString,
    pub line_number: u16,
    pub num_args: u8,
    /// Payload offset of the first argument tag.
    pub args_offset: usize,
}

impl Header {
    pub(crate) fn finish(self, args: Vec<Argument>, trailing_bytes: usize) -> ParsedMessage {
        ParsedMessage {
            message: LogMessage {
                severity: self.severity,
                micros: self.micros,
                file_name: self.file_name,
                line_number: self.line_number,
                args,
            },
            trailing_bytes,
        }
    }
}

pub(crate) fn parse_header(payload: &[u8]) -> Result<Header, DecodeError> {
    let reader = PayloadReader::new(payload);

    let micros = reader.read_u32_le(layout::MICROS_RANGE.start)?;
    let (file_name, file_name_span) = reader.read_lp_bytes(layout::FILE_NAME_OFFSET)?;

    let mut offset = layout::FILE_NAME_OFFSET + file_name_span;
    reader.require_len(offset + layout::HEADER_TAIL_SIZE)?;
    let line_number = reader.read_u16_le(offset)?;
    offset += layout::LINE_NUMBER_SIZE;
    let severity = Severity::try_from(reader.read_u8(offset)?)?;
    offset += layout::SEVERITY_SIZE;
    let num_args = reader.read_u8(offset)?;
    offset += layout::NUM_ARGS_SIZE;

    Ok(Header {
        severity,
        micros,
        file_name: LpString::new(file_name),
        line_number,
        num_args,
        args_offset: offset,
    })
}

/// Decodes a frame payload into a [`LogMessage`].
///
/// Bytes after the last declared argument are tolerated; use
/// [`parse_message`] to observe how many there were.
///
/// # Examples
/// ```
/// use binlog_core::{Severity, decode_message};
///
/// let payload = [
///     0x87, 0xD6, 0x12, 0x00, 0x03, b'a', b'.', b'c', 0x0A, 0x00, 0x02, 0x01, 0x01, 0x05,
/// ];
/// let msg = decode_message(&payload).unwrap();
/// assert_eq!(msg.severity, Severity::Info);
/// assert_eq!(msg.line_number, 10);
/// ```
pub fn decode_message(payload: &[u8]) -> Result<LogMessage, DecodeError> {
    let parsed = parse_message(payload)?;
    if parsed.trailing_bytes > 0 {
        tracing::debug!(
            trailing_bytes = parsed.trailing_bytes,
            "ignoring bytes after last argument"
        );
    }
    Ok(parsed.message)
}
