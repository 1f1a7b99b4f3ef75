//! Byte sources feeding the frame reader.
//!
//! A source only has to support "read up to N bytes, blocking". Opening and
//! configuring serial devices stays outside this crate; a device node opened
//! as a file is just another `Read`.

mod cancel;
mod reader;

pub use cancel::CancelToken;
pub use reader::{ReaderSource, open_input};

use thiserror::Error;

pub trait ByteSource {
    /// Blocks until `n` bytes are available or the source is exhausted.
    ///
    /// On exhaustion fewer than `n` bytes are returned, possibly none.
    fn read_up_to(&mut self, n: usize) -> Result<Vec<u8>, SourceError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_up_to(&mut self, n: usize) -> Result<Vec<u8>, SourceError> {
        S::read_up_to(*self, n)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
