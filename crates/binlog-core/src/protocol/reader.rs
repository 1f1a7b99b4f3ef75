use super::error::DecodeError;
use super::layout;

/// Bounds-checked reads over a single frame payload.
pub struct PayloadReader<'a> {
    payload: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.payload.len() < needed {
            return Err(DecodeError::TruncatedFrame {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(DecodeError::TruncatedFrame {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_le(&self, offset: usize) -> Result<u16, DecodeError> {
        let bytes = self.read_slice(offset..offset + 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&self, offset: usize) -> Result<u32, DecodeError> {
        let bytes = self.read_slice(offset..offset + 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.payload
            .get(range.clone())
            .ok_or(DecodeError::TruncatedFrame {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    /// Reads a `u8` length prefix followed by that many raw bytes.
    ///
    /// Returns the string bytes and the total span including the prefix.
    pub fn read_lp_bytes(&self, offset: usize) -> Result<(&'a [u8], usize), DecodeError> {
        let len = self.read_u8(offset)? as usize;
        let start = offset + layout::STRING_LENGTH_SIZE;
        let bytes = self.read_slice(start..start + len)?;
        Ok((bytes, layout::STRING_LENGTH_SIZE + len))
    }
}
