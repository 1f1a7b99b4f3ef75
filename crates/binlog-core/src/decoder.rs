//! Pull-based message stream over a byte source.
//!
//! Each call to [`MessageDecoder::next_message`] walks
//! `AwaitingLength -> AwaitingPayload -> ParsingHeader -> ParsingArgs ->
//! MessageReady`. End of stream is only clean before the first byte of a
//! frame; every other short read or invalid byte leaves the decoder in
//! `Failed`, and no further bytes are read.

use crate::protocol::argument::decode_argument;
use crate::protocol::error::DecodeError;
use crate::protocol::frame::{read_frame_body, read_frame_length};
use crate::protocol::message::{LogMessage, parse_header};
use crate::source::{ByteSource, CancelToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    AwaitingLength,
    AwaitingPayload { len: usize },
    ParsingHeader,
    ParsingArgs { remaining: u8 },
    MessageReady,
    EndOfStream,
    Cancelled,
    Failed,
}

impl DecoderState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DecoderState::EndOfStream | DecoderState::Cancelled | DecoderState::Failed
        )
    }
}

/// Decodes log messages from a [`ByteSource`], one frame per call.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use binlog_core::{MessageDecoder, ReaderSource, format_line};
///
/// let frame = [
///     0x0E, 0x00, 0x87, 0xD6, 0x12, 0x00, 0x03, b'a', b'.', b'c', 0x0A, 0x00, 0x02, 0x01,
///     0x01, 0x05,
/// ];
/// let mut decoder = MessageDecoder::new(ReaderSource::new(Cursor::new(frame.to_vec())));
/// let msg = decoder.next_message()?.expect("one message");
/// assert_eq!(format_line(&msg), "I0001.234567 a.c:10: 5");
/// assert!(decoder.next_message()?.is_none());
/// # Ok::<(), binlog_core::DecodeError>(())
/// ```
pub struct MessageDecoder<S> {
    source: S,
    state: DecoderState,
    cancel: Option<CancelToken>,
    frames_decoded: u64,
    trailing_bytes: u64,
}

impl<S: ByteSource> MessageDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: DecoderState::AwaitingLength,
            cancel: None,
            frames_decoded: 0,
            trailing_bytes: 0,
        }
    }

    /// Stops the decoder at the next frame boundary once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Total payload bytes ignored after the last argument, across all frames.
    pub fn trailing_bytes(&self) -> u64 {
        self.trailing_bytes
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Pulls the next message, blocking on the source.
    ///
    /// Returns `Ok(None)` at a clean end of stream or after cancellation.
    ///
    /// # Errors
    /// The first `DecodeError` is returned as is; later calls return
    /// `DecodeError::Terminated` without touching the source.
    pub fn next_message(&mut self) -> Result<Option<LogMessage>, DecodeError> {
        match self.state {
            DecoderState::EndOfStream | DecoderState::Cancelled => return Ok(None),
            DecoderState::Failed => return Err(DecodeError::Terminated),
            _ => {}
        }

        self.pull().inspect_err(|err| {
            tracing::debug!(state = ?self.state, error = %err, "decoder failed");
            self.state = DecoderState::Failed;
        })
    }

    fn pull(&mut self) -> Result<Option<LogMessage>, DecodeError> {
        self.state = DecoderState::AwaitingLength;
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            tracing::debug!(frames = self.frames_decoded, "decoder cancelled");
            self.state = DecoderState::Cancelled;
            return Ok(None);
        }

        let Some(len) = read_frame_length(&mut self.source)? else {
            tracing::debug!(frames = self.frames_decoded, "end of stream");
            self.state = DecoderState::EndOfStream;
            return Ok(None);
        };

        self.state = DecoderState::AwaitingPayload { len };
        let payload = read_frame_body(&mut self.source, len)?;
        tracing::trace!(len, "frame received");

        self.state = DecoderState::ParsingHeader;
        let header = parse_header(&payload)?;

        let mut offset = header.args_offset;
        let mut args = Vec::with_capacity(header.num_args as usize);
        for remaining in (1..=header.num_args).rev() {
            self.state = DecoderState::ParsingArgs { remaining };
            let (arg, consumed) = decode_argument(&payload, offset)?;
            args.push(arg);
            offset += consumed;
        }

        let parsed = header.finish(args, payload.len() - offset);
        if parsed.trailing_bytes > 0 {
            tracing::debug!(
                trailing_bytes = parsed.trailing_bytes,
                "ignoring bytes after last argument"
            );
            self.trailing_bytes += parsed.trailing_bytes as u64;
        }

        self.frames_decoded += 1;
        self.state = DecoderState::MessageReady;
        Ok(Some(parsed.message))
    }
}

impl<S: ByteSource> Iterator for MessageDecoder<S> {
    type Item = Result<LogMessage, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_message() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) | Err(DecodeError::Terminated) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
