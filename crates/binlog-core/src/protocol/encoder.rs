use super::argument::{Argument, LpString};
use super::error::EncodeError;
use super::layout;
use super::message::LogMessage;

/// Encodes a message payload exactly as the firmware writes it.
///
/// # Errors
/// Returns `EncodeError` when a string, the argument list or the payload does
/// not fit its length field.
pub fn encode_payload(message: &LogMessage) -> Result<Vec<u8>, EncodeError> {
    if message.args.len() > layout::MAX_ARGS {
        return Err(EncodeError::TooManyArguments {
            count: message.args.len(),
            max: layout::MAX_ARGS,
        });
    }

    let mut out = Vec::with_capacity(payload_len(message));
    out.extend_from_slice(&message.micros.to_le_bytes());
    put_lp_string(&mut out, &message.file_name)?;
    out.extend_from_slice(&message.line_number.to_le_bytes());
    out.push(message.severity.as_byte());
    out.push(message.args.len() as u8);
    for arg in &message.args {
        put_argument(&mut out, arg)?;
    }

    if out.len() > layout::MAX_PAYLOAD_LEN {
        return Err(EncodeError::PayloadTooLarge {
            len: out.len(),
            max: layout::MAX_PAYLOAD_LEN,
        });
    }
    Ok(out)
}

/// Encodes a message with its `u16` length prefix.
///
/// # Examples
/// ```
/// use binlog_core::{Argument, LogMessage, Severity, encode_frame};
///
/// let msg = LogMessage {
///     severity: Severity::Info,
///     micros: 1_234_567,
///     file_name: "a.c".into(),
///     line_number: 10,
///     args: vec![Argument::UInt8(5)],
/// };
/// let frame = encode_frame(&msg).unwrap();
/// assert_eq!(&frame[..2], &[0x0E, 0x00]);
/// assert_eq!(frame.len(), 16);
/// ```
pub fn encode_frame(message: &LogMessage) -> Result<Vec<u8>, EncodeError> {
    let payload = encode_payload(message)?;
    let mut out = Vec::with_capacity(layout::LENGTH_PREFIX_SIZE + payload.len());
    out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

fn payload_len(message: &LogMessage) -> usize {
    layout::MICROS_RANGE.len()
        + layout::STRING_LENGTH_SIZE
        + message.file_name.as_bytes().len()
        + layout::HEADER_TAIL_SIZE
        + message.args.iter().map(Argument::encoded_len).sum::<usize>()
}

fn put_lp_string(out: &mut Vec<u8>, value: &LpString) -> Result<(), EncodeError> {
    let bytes = value.as_bytes();
    if bytes.len() > layout::MAX_STRING_LEN {
        return Err(EncodeError::StringTooLong {
            len: bytes.len(),
            max: layout::MAX_STRING_LEN,
        });
    }
    out.push(bytes.len() as u8);
    out.extend_from_slice(bytes);
    Ok(())
}

fn put_argument(out: &mut Vec<u8>, arg: &Argument) -> Result<(), EncodeError> {
    out.push(arg.value_type().tag());
    match arg {
        Argument::UInt8(v) => out.push(*v),
        Argument::UInt16(v) => out.extend_from_slice(&v.to_le_bytes()),
        Argument::UInt32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Argument::String(s) => put_lp_string(out, s)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{encode_frame, encode_payload};
    use crate::protocol::argument::{Argument, LpString};
    use crate::protocol::error::EncodeError;
    use crate::protocol::message::{LogMessage, Severity, decode_message};

    fn message(args: Vec<Argument>) -> LogMessage {
        LogMessage {
            severity: Severity::Info,
            micros: 65_535,
            file_name: LpString::from("dir/file.cc"),
            line_number: 15,
            args,
        }
    }

    #[test]
    fn matches_firmware_byte_layout() {
        let frame = encode_frame(&message(vec![Argument::UInt8(1)])).unwrap();
        let mut expected = vec![0x16, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x0B];
        expected.extend_from_slice(b"dir/file.cc");
        expected.extend_from_slice(&[0x0F, 0x00, 0x02, 0x01, 0x01, 0x01]);
        assert_eq!(frame, expected);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let original = LogMessage {
            severity: Severity::Fatal,
            micros: u32::MAX,
            file_name: LpString::from("devices/distance_sensor.h"),
            line_number: u16::MAX,
            args: vec![
                Argument::String(LpString::from("front")),
                Argument::UInt16(1234),
                Argument::UInt32(4_000_000_000),
                Argument::UInt8(0),
                Argument::String(LpString::default()),
            ],
        };
        let payload = encode_payload(&original).unwrap();
        assert_eq!(decode_message(&payload).unwrap(), original);
    }

    #[test]
    fn rejects_long_strings() {
        let msg = message(vec![Argument::String(LpString::new(vec![b'x'; 256]))]);
        let err = encode_payload(&msg).unwrap_err();
        assert_eq!(err, EncodeError::StringTooLong { len: 256, max: 255 });
    }

    #[test]
    fn rejects_too_many_arguments() {
        let msg = message(vec![Argument::UInt8(0); 256]);
        let err = encode_payload(&msg).unwrap_err();
        assert_eq!(err, EncodeError::TooManyArguments { count: 256, max: 255 });
    }

    #[test]
    fn rejects_oversized_payload() {
        let big = Argument::String(LpString::new(vec![b'x'; 255]));
        let msg = message(vec![big; 255]);
        let err = encode_payload(&msg).unwrap_err();
        assert!(matches!(err, EncodeError::PayloadTooLarge { .. }));
    }
}
