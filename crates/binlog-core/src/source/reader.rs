use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::{ByteSource, SourceError};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Adapts any blocking `Read` into a [`ByteSource`].
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use binlog_core::{ByteSource, ReaderSource};
///
/// let mut source = ReaderSource::new(Cursor::new(vec![1u8, 2, 3]));
/// assert_eq!(source.read_up_to(2)?, vec![1, 2]);
/// assert_eq!(source.read_up_to(2)?, vec![3]);
/// assert!(source.read_up_to(2)?.is_empty());
/// # Ok::<(), binlog_core::SourceError>(())
/// ```
pub struct ReaderSource<R> {
    inner: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl ReaderSource<BufReader<File>> {
    /// Opens a capture file or a device node.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_up_to(&mut self, n: usize) -> Result<Vec<u8>, SourceError> {
        let mut buf = Vec::with_capacity(n);
        // `read_to_end` retries on `Interrupted` and stops at the `take` limit.
        (&mut self.inner).take(n as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// Opens `path` as a boxed reader, treating `-` as standard input.
pub fn open_input(path: &Path) -> Result<ReaderSource<Box<dyn Read>>, SourceError> {
    let reader: Box<dyn Read> = if path.as_os_str() == STDIN_PATH {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(path)?))
    };
    Ok(ReaderSource::new(reader))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use super::ReaderSource;
    use crate::source::{ByteSource, SourceError};

    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        interrupted: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn assembles_partial_reads() {
        let mut source = ReaderSource::new(Trickle {
            data: vec![1, 2, 3, 4],
            pos: 0,
            interrupted: false,
        });
        assert_eq!(source.read_up_to(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(source.read_up_to(3).unwrap(), vec![4]);
    }

    #[test]
    fn exhausted_source_returns_empty() {
        let mut source = ReaderSource::new(Cursor::new(Vec::<u8>::new()));
        assert!(source.read_up_to(2).unwrap().is_empty());
    }

    #[test]
    fn borrowed_source_advances_the_owner() {
        fn take_two<S: ByteSource>(mut source: S) -> Vec<u8> {
            source.read_up_to(2).unwrap()
        }

        let mut source = ReaderSource::new(Cursor::new(vec![1, 2, 3]));
        assert_eq!(take_two(&mut source), vec![1, 2]);
        assert_eq!(source.read_up_to(2).unwrap(), vec![3]);
    }

    #[test]
    fn io_errors_surface() {
        let mut source = ReaderSource::new(Broken);
        let err = source.read_up_to(1).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
