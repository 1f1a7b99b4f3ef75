use serde::Serialize;

use crate::decoder::MessageDecoder;
use crate::protocol::argument::{Argument, ArgumentType, LpString};
use crate::protocol::message::LogMessage;
use crate::source::ByteSource;

use super::error::{SchemaError, TrackerError};

/// Field names and wire types of a distance reading, in argument order.
pub const SCHEMA: [(&str, ArgumentType); 5] = [
    ("sensor_id", ArgumentType::String),
    ("distance_mm", ArgumentType::UInt16),
    ("trig_low_micros", ArgumentType::UInt32),
    ("echo_high_micros", ArgumentType::UInt32),
    ("echo_low_micros", ArgumentType::UInt32),
];

/// One distance sensor sample, validated against [`SCHEMA`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceReading {
    pub sensor_id: LpString,
    pub distance_mm: u16,
    /// Trigger pulse falling edge.
    pub trig_low_micros: u32,
    /// Echo pulse rising edge.
    pub echo_high_micros: u32,
    /// Echo pulse falling edge.
    pub echo_low_micros: u32,
}

impl DistanceReading {
    /// Midpoint of the echo pulse, taken as the time of the reading.
    pub fn reading_micros(&self) -> i64 {
        (i64::from(self.echo_high_micros) + i64::from(self.echo_low_micros)) / 2
    }
}

impl TryFrom<&LogMessage> for DistanceReading {
    type Error = SchemaError;

    fn try_from(message: &LogMessage) -> Result<Self, Self::Error> {
        match message.args.as_slice() {
            [
                Argument::String(sensor_id),
                Argument::UInt16(distance_mm),
                Argument::UInt32(trig_low_micros),
                Argument::UInt32(echo_high_micros),
                Argument::UInt32(echo_low_micros),
            ] => Ok(DistanceReading {
                sensor_id: sensor_id.clone(),
                distance_mm: *distance_mm,
                trig_low_micros: *trig_low_micros,
                echo_high_micros: *echo_high_micros,
                echo_low_micros: *echo_low_micros,
            }),
            args => Err(schema_mismatch(args)),
        }
    }
}

/// Reinterprets a log message as a distance reading.
///
/// # Examples
/// ```
/// use binlog_core::{Argument, LogMessage, LpString, Severity, to_distance_reading};
///
/// let msg = LogMessage {
///     severity: Severity::Info,
///     micros: 0,
///     file_name: "distance_sensor.h".into(),
///     line_number: 1,
///     args: vec![
///         Argument::String("front".into()),
///         Argument::UInt16(250),
///         Argument::UInt32(100),
///         Argument::UInt32(200),
///         Argument::UInt32(1_650),
///     ],
/// };
/// let reading = to_distance_reading(&msg).unwrap();
/// assert_eq!(reading.sensor_id, LpString::from("front"));
/// assert_eq!(reading.reading_micros(), 925);
/// ```
pub fn to_distance_reading(message: &LogMessage) -> Result<DistanceReading, SchemaError> {
    DistanceReading::try_from(message)
}

/// Drains `decoder`, converting every message into a reading.
///
/// Stops at the first decode or schema error.
pub fn collect_readings<S: ByteSource>(
    decoder: &mut MessageDecoder<S>,
) -> Result<Vec<DistanceReading>, TrackerError> {
    let mut readings = Vec::new();
    while let Some(message) = decoder.next_message()? {
        readings.push(DistanceReading::try_from(&message)?);
    }
    Ok(readings)
}

fn schema_mismatch(args: &[Argument]) -> SchemaError {
    if args.len() != SCHEMA.len() {
        return SchemaError::ArgumentCount {
            expected: SCHEMA.len(),
            actual: args.len(),
        };
    }
    SCHEMA
        .iter()
        .zip(args)
        .enumerate()
        .find_map(|(index, ((field, expected), arg))| {
            let actual = arg.value_type();
            (actual != *expected).then_some(SchemaError::ArgumentType {
                index,
                field: *field,
                expected: *expected,
                actual,
            })
        })
        .unwrap_or(SchemaError::ArgumentCount {
            expected: SCHEMA.len(),
            actual: args.len(),
        })
}
