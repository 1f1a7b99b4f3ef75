use crate::source::ByteSource;

use super::error::DecodeError;
use super::layout;

/// Pulls the next length-prefixed payload from `source`.
///
/// Returns `Ok(None)` only when the source is exhausted before any byte of a
/// new frame was read. A partial length prefix or a short payload is
/// `TruncatedFrame`.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use binlog_core::{ReaderSource, next_frame_payload};
///
/// let mut source = ReaderSource::new(Cursor::new(vec![0x02, 0x00, 0xAA, 0xBB]));
/// assert_eq!(next_frame_payload(&mut source)?, Some(vec![0xAA, 0xBB]));
/// assert_eq!(next_frame_payload(&mut source)?, None);
/// # Ok::<(), binlog_core::DecodeError>(())
/// ```
pub fn next_frame_payload<S: ByteSource>(source: &mut S) -> Result<Option<Vec<u8>>, DecodeError> {
    let Some(len) = read_frame_length(source)? else {
        return Ok(None);
    };
    read_frame_body(source, len).map(Some)
}

pub(crate) fn read_frame_length<S: ByteSource>(
    source: &mut S,
) -> Result<Option<usize>, DecodeError> {
    let prefix = source.read_up_to(layout::LENGTH_PREFIX_SIZE)?;
    match prefix.len() {
        0 => Ok(None),
        layout::LENGTH_PREFIX_SIZE => Ok(Some(u16::from_le_bytes([prefix[0], prefix[1]]) as usize)),
        actual => Err(DecodeError::TruncatedFrame {
            needed: layout::LENGTH_PREFIX_SIZE,
            actual,
        }),
    }
}

pub(crate) fn read_frame_body<S: ByteSource>(
    source: &mut S,
    len: usize,
) -> Result<Vec<u8>, DecodeError> {
    let payload = source.read_up_to(len)?;
    if payload.len() < len {
        return Err(DecodeError::TruncatedFrame {
            needed: len,
            actual: payload.len(),
        });
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::next_frame_payload;
    use crate::protocol::error::DecodeError;
    use crate::source::ReaderSource;

    fn source(bytes: &[u8]) -> ReaderSource<Cursor<Vec<u8>>> {
        ReaderSource::new(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn reads_consecutive_frames() {
        let mut src = source(&[0x01, 0x00, 0x07, 0x00, 0x00, 0x02, 0x00, 0x08, 0x09]);
        assert_eq!(next_frame_payload(&mut src).unwrap(), Some(vec![0x07]));
        assert_eq!(next_frame_payload(&mut src).unwrap(), Some(vec![]));
        assert_eq!(next_frame_payload(&mut src).unwrap(), Some(vec![0x08, 0x09]));
        assert_eq!(next_frame_payload(&mut src).unwrap(), None);
    }

    #[test]
    fn empty_source_is_end_of_stream() {
        let mut src = source(&[]);
        assert_eq!(next_frame_payload(&mut src).unwrap(), None);
    }

    #[test]
    fn half_length_prefix_is_truncated() {
        let mut src = source(&[0x0E]);
        let err = next_frame_payload(&mut src).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedFrame {
                needed: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn short_payload_is_truncated() {
        let mut src = source(&[0x03, 0x00, 0x01, 0x02]);
        let err = next_frame_payload(&mut src).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedFrame {
                needed: 3,
                actual: 2
            }
        ));
    }
}
