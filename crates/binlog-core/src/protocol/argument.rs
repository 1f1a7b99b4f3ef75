use std::fmt;

use serde::{Serialize, Serializer};

use super::error::DecodeError;
use super::layout;
use super::reader::PayloadReader;

/// Short length-prefixed string as sent by the firmware.
///
/// The bytes are kept verbatim; they are not required to be UTF-8 and are
/// rendered lossily for display.
///
/// # Examples
/// ```
/// use binlog_core::LpString;
///
/// let name = LpString::from("a.c");
/// assert_eq!(name.as_bytes(), b"a.c");
/// assert_eq!(name.to_string(), "a.c");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LpString(Vec<u8>);

impl LpString {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_string_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for LpString {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for LpString {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl fmt::Display for LpString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Serialize for LpString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

/// Wire type of a single argument, keyed by its tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    UInt8,
    UInt16,
    UInt32,
    String,
}

impl ArgumentType {
    pub fn tag(self) -> u8 {
        match self {
            ArgumentType::UInt8 => layout::TAG_UINT8,
            ArgumentType::UInt16 => layout::TAG_UINT16,
            ArgumentType::UInt32 => layout::TAG_UINT32,
            ArgumentType::String => layout::TAG_STRING,
        }
    }
}

impl TryFrom<u8> for ArgumentType {
    type Error = DecodeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            layout::TAG_UINT8 => Ok(ArgumentType::UInt8),
            layout::TAG_UINT16 => Ok(ArgumentType::UInt16),
            layout::TAG_UINT32 => Ok(ArgumentType::UInt32),
            layout::TAG_STRING => Ok(ArgumentType::String),
            other => Err(DecodeError::UnknownArgumentType { tag: other }),
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgumentType::UInt8 => "uint8",
            ArgumentType::UInt16 => "uint16",
            ArgumentType::UInt32 => "uint32",
            ArgumentType::String => "string",
        };
        f.write_str(name)
    }
}

/// A decoded log argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Argument {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    String(LpString),
}

impl Argument {
    pub fn value_type(&self) -> ArgumentType {
        match self {
            Argument::UInt8(_) => ArgumentType::UInt8,
            Argument::UInt16(_) => ArgumentType::UInt16,
            Argument::UInt32(_) => ArgumentType::UInt32,
            Argument::String(_) => ArgumentType::String,
        }
    }

    /// Number of bytes this argument occupies on the wire, tag included.
    pub fn encoded_len(&self) -> usize {
        let value_len = match self {
            Argument::UInt8(_) => 1,
            Argument::UInt16(_) => 2,
            Argument::UInt32(_) => 4,
            Argument::String(s) => layout::STRING_LENGTH_SIZE + s.as_bytes().len(),
        };
        layout::TAG_SIZE + value_len
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::UInt8(v) => write!(f, "{v}"),
            Argument::UInt16(v) => write!(f, "{v}"),
            Argument::UInt32(v) => write!(f, "{v}"),
            Argument::String(s) => write!(f, "{s}"),
        }
    }
}

/// Decodes one tagged argument starting at `offset`.
///
/// Returns the argument and the number of bytes consumed, tag included.
///
/// # Errors
/// `UnknownArgumentType` for a tag outside 1..=4, `TruncatedFrame` when the
/// value would extend past the payload.
///
/// # Examples
/// ```
/// use binlog_core::{Argument, decode_argument};
///
/// let (arg, consumed) = decode_argument(&[0x02, 0x34, 0x12], 0).unwrap();
/// assert_eq!(arg, Argument::UInt16(0x1234));
/// assert_eq!(consumed, 3);
/// ```
pub fn decode_argument(payload: &[u8], offset: usize) -> Result<(Argument, usize), DecodeError> {
    let reader = PayloadReader::new(payload);
    let value_type = ArgumentType::try_from(reader.read_u8(offset)?)?;
    let value_offset = offset + layout::TAG_SIZE;

    let (argument, value_len) = match value_type {
        ArgumentType::UInt8 => (Argument::UInt8(reader.read_u8(value_offset)?), 1),
        ArgumentType::UInt16 => (Argument::UInt16(reader.read_u16_le(value_offset)?), 2),
        ArgumentType::UInt32 => (Argument::UInt32(reader.read_u32_le(value_offset)?), 4),
        ArgumentType::String => {
            let (bytes, span) = reader.read_lp_bytes(value_offset)?;
            (Argument::String(LpString::new(bytes)), span)
        }
    };

    Ok((argument, layout::TAG_SIZE + value_len))
}

#[cfg(test)]
mod tests {
    use super::{Argument, ArgumentType, LpString, decode_argument};
    use crate::protocol::error::DecodeError;

    #[test]
    fn consumed_width_matches_tag() {
        let cases: [(&[u8], Argument, usize); 4] = [
            (&[0x01, 0x05], Argument::UInt8(5), 2),
            (&[0x02, 0x0A, 0x00], Argument::UInt16(10), 3),
            (&[0x03, 0x87, 0xD6, 0x12, 0x00], Argument::UInt32(1_234_567), 5),
            (
                &[0x04, 0x04, b'l', b'e', b'f', b't'],
                Argument::String(LpString::from("left")),
                6,
            ),
        ];
        for (bytes, expected, width) in cases {
            let (arg, consumed) = decode_argument(bytes, 0).unwrap();
            assert_eq!(arg, expected);
            assert_eq!(consumed, width);
            assert_eq!(arg.encoded_len(), width);
        }
    }

    #[test]
    fn does_not_read_past_value() {
        let payload = [0xAA, 0x01, 0x07, 0x02, 0x01, 0x00];
        let (arg, consumed) = decode_argument(&payload, 1).unwrap();
        assert_eq!(arg, Argument::UInt8(7));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn empty_string_consumes_two_bytes() {
        let (arg, consumed) = decode_argument(&[0x04, 0x00], 0).unwrap();
        assert_eq!(arg, Argument::String(LpString::default()));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        for tag in [0u8, 5, 0xFF] {
            let err = decode_argument(&[tag, 0x00, 0x00], 0).unwrap_err();
            assert!(matches!(err, DecodeError::UnknownArgumentType { tag: t } if t == tag));
        }
    }

    #[test]
    fn truncated_values_are_rejected() {
        let cases: [&[u8]; 5] = [
            &[],
            &[0x01],
            &[0x02, 0x0A],
            &[0x03, 0x87, 0xD6, 0x12],
            &[0x04, 0x03, b'a', b'b'],
        ];
        for bytes in cases {
            let err = decode_argument(bytes, 0).unwrap_err();
            assert!(
                matches!(err, DecodeError::TruncatedFrame { .. }),
                "expected truncation for {bytes:?}"
            );
        }
    }

    #[test]
    fn tag_round_trips_through_type() {
        for tag in 1u8..=4 {
            assert_eq!(ArgumentType::try_from(tag).unwrap().tag(), tag);
        }
    }

    #[test]
    fn non_utf8_string_is_kept_verbatim() {
        let (arg, _) = decode_argument(&[0x04, 0x02, 0xFF, 0xFE], 0).unwrap();
        match arg {
            Argument::String(s) => assert_eq!(s.as_bytes(), &[0xFF, 0xFE]),
            other => panic!("unexpected argument {other:?}"),
        }
    }
}
