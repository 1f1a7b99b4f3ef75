use std::collections::HashSet;

use crate::format::format_timestamp;
use crate::protocol::message::LogMessage;

use super::error::TrackerError;
use super::reading::DistanceReading;

pub const DEFAULT_SENSORS: [&str; 3] = ["left", "front", "right"];

const SENSOR_SEPARATOR: &str = "    ";

/// Last known reading of one sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorState {
    pub id: String,
    pub last: Option<DistanceReading>,
}

/// Per-sensor live status over a stream of distance readings.
///
/// Delays are computed against the echo end of the newest reading from any
/// sensor, so each entry shows how stale it is relative to the latest sample.
///
/// # Examples
/// ```
/// use binlog_core::{DistanceReading, Tracker};
///
/// let mut tracker = Tracker::default();
/// tracker.on_reading(DistanceReading {
///     sensor_id: "front".into(),
///     distance_mm: 250,
///     trig_low_micros: 1_000,
///     echo_high_micros: 1_200,
///     echo_low_micros: 2_650,
/// })?;
/// assert_eq!(
///     tracker.render(),
///     "0000.002650  left    front= 250 mm  +  0ms    right"
/// );
/// # Ok::<(), binlog_core::TrackerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tracker {
    sensors: Vec<SensorState>,
    last_global_micros: Option<u32>,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::from_states(
            DEFAULT_SENSORS
                .iter()
                .map(|id| SensorState {
                    id: id.to_string(),
                    last: None,
                })
                .collect(),
        )
    }
}

impl Tracker {
    /// Creates a tracker for a fixed, ordered set of sensor ids.
    ///
    /// # Errors
    /// `DuplicateSensor` when an id appears twice.
    pub fn new<I, S>(sensor_ids: I) -> Result<Self, TrackerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut sensors = Vec::new();
        for id in sensor_ids {
            let id = id.into();
            if !seen.insert(id.clone()) {
                return Err(TrackerError::DuplicateSensor { id });
            }
            sensors.push(SensorState { id, last: None });
        }
        Ok(Self::from_states(sensors))
    }

    fn from_states(sensors: Vec<SensorState>) -> Self {
        Self {
            sensors,
            last_global_micros: None,
        }
    }

    pub fn sensors(&self) -> &[SensorState] {
        &self.sensors
    }

    /// Echo end of the most recently processed reading, across all sensors.
    pub fn last_global_micros(&self) -> Option<u32> {
        self.last_global_micros
    }

    /// Validates `message` as a distance reading and records it.
    pub fn on_message(&mut self, message: &LogMessage) -> Result<(), TrackerError> {
        self.on_reading(DistanceReading::try_from(message)?)
    }

    pub fn on_reading(&mut self, reading: DistanceReading) -> Result<(), TrackerError> {
        let Some(slot) = self
            .sensors
            .iter_mut()
            .find(|sensor| sensor.id.as_bytes() == reading.sensor_id.as_bytes())
        else {
            return Err(TrackerError::UnknownSensor {
                id: reading.sensor_id.to_string(),
            });
        };
        self.last_global_micros = Some(reading.echo_low_micros);
        slot.last = Some(reading);
        Ok(())
    }

    /// Milliseconds between a sensor's reading and the newest global sample.
    ///
    /// Negative after a counter wrap.
    pub fn delay_ms(&self, reading: &DistanceReading) -> i64 {
        let latest = i64::from(self.last_global_micros.unwrap_or(0));
        (latest - reading.reading_micros()).div_euclid(1000)
    }

    /// One segment per sensor, in declaration order.
    pub fn render_sensors(&self) -> Vec<String> {
        self.sensors
            .iter()
            .map(|sensor| match &sensor.last {
                None => sensor.id.clone(),
                Some(reading) => format!(
                    "{}={:4} mm  +{:3}ms",
                    sensor.id,
                    reading.distance_mm,
                    self.delay_ms(reading)
                ),
            })
            .collect()
    }

    /// Full status line: global timestamp followed by every sensor.
    pub fn render(&self) -> String {
        format!(
            "{}  {}",
            format_timestamp(self.last_global_micros.unwrap_or(0)),
            self.render_sensors().join(SENSOR_SEPARATOR)
        )
    }
}
