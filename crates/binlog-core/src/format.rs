//! Text rendering for decoded messages and raw bytes.

use std::fmt::Write;

use crate::protocol::message::LogMessage;

const MICROS_PER_SECOND: u32 = 1_000_000;

/// Renders a microsecond counter as `SSSS.uuuuuu`.
///
/// # Examples
/// ```
/// use binlog_core::format_timestamp;
///
/// assert_eq!(format_timestamp(1_234_567), "0001.234567");
/// assert_eq!(format_timestamp(4_294_967_295), "4294.967295");
/// ```
pub fn format_timestamp(micros: u32) -> String {
    format!(
        "{:04}.{:06}",
        micros / MICROS_PER_SECOND,
        micros % MICROS_PER_SECOND
    )
}

/// Renders a message as `<S><secs>.<micros> <file>:<line>: <args>`.
///
/// Arguments are concatenated without a separator.
pub fn format_line(message: &LogMessage) -> String {
    let mut line = format!(
        "{}{} {}:{}: ",
        message.severity.initial(),
        format_timestamp(message.micros),
        message.file_name,
        message.line_number
    );
    for arg in &message.args {
        let _ = write!(line, "{arg}");
    }
    line
}

pub fn format_hex_byte(byte: u8) -> String {
    format!("0x{byte:02x}")
}

#[cfg(test)]
mod tests {
    use super::{format_hex_byte, format_line, format_timestamp};
    use crate::protocol::argument::{Argument, LpString};
    use crate::protocol::message::{LogMessage, Severity};

    fn scenario() -> LogMessage {
        LogMessage {
            severity: Severity::Info,
            micros: 1_234_567,
            file_name: LpString::from("a.c"),
            line_number: 10,
            args: vec![Argument::UInt8(5)],
        }
    }

    #[test]
    fn formats_scenario_line() {
        assert_eq!(format_line(&scenario()), "I0001.234567 a.c:10: 5");
    }

    #[test]
    fn concatenates_arguments_without_separator() {
        let msg = LogMessage {
            severity: Severity::Fatal,
            micros: 12_000_001,
            file_name: LpString::from("dir/file.cc"),
            line_number: 15,
            args: vec![
                Argument::String(LpString::from("distance=")),
                Argument::UInt16(250),
                Argument::String(LpString::from(" t=")),
                Argument::UInt32(70_000),
            ],
        };
        assert_eq!(
            format_line(&msg),
            "F0012.000001 dir/file.cc:15: distance=250 t=70000"
        );
    }

    #[test]
    fn no_arguments_leaves_trailing_space() {
        let mut msg = scenario();
        msg.args.clear();
        assert_eq!(format_line(&msg), "I0001.234567 a.c:10: ");
    }

    #[test]
    fn formatting_is_repeatable() {
        let msg = scenario();
        assert_eq!(format_line(&msg), format_line(&msg.clone()));
    }

    #[test]
    fn zero_pads_small_timestamps() {
        assert_eq!(format_timestamp(0), "0000.000000");
        assert_eq!(format_timestamp(999_999), "0000.999999");
        assert_eq!(format_timestamp(3_755_065_408), "3755.065408");
    }

    #[test]
    fn hex_bytes_are_lowercase() {
        assert_eq!(format_hex_byte(0x0E), "0x0e");
        assert_eq!(format_hex_byte(0xFF), "0xff");
    }
}
