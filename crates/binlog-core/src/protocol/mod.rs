//! Binary log wire format.
//!
//! The protocol follows a layered structure:
//! - `layout`: widths, offsets, tag and severity bytes (source of truth)
//! - `reader`: bounds-checked byte access over one payload
//! - `argument` / `message`: domain-level decoding (no direct byte indexing)
//! - `frame`: length-prefixed payload extraction from a byte source
//! - `encoder`: the firmware-side writer, used for fixtures and tests
//! - `error`: explicit, actionable errors
//!
//! Frame := u16 LE length, payload. Payload := u32 LE micros, LPString file
//! name, u16 LE line number, u8 severity, u8 argument count, arguments.
//! There is no checksum and no resynchronization marker.

pub mod argument;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod layout;
pub mod message;
pub mod reader;

pub use argument::{Argument, ArgumentType, LpString, decode_argument};
pub use encoder::{encode_frame, encode_payload};
pub use error::{DecodeError, EncodeError};
pub use frame::next_frame_payload;
pub use message::{LogMessage, ParsedMessage, Severity, decode_message, parse_message};
