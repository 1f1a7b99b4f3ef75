//! Distance sensor telemetry.
//!
//! The firmware logs each ultrasonic reading as a plain log message whose
//! arguments follow a fixed convention: sensor id, distance in millimetres,
//! and three timestamps (trigger end, echo start, echo end). Nothing on the
//! wire marks such a message, so `reading` checks argument count and types
//! before exposing named fields. `tracker` keeps the last reading per sensor
//! for a live status display.

pub mod error;
pub mod reading;
pub mod tracker;

pub use error::{SchemaError, TrackerError};
pub use reading::{DistanceReading, collect_readings, to_distance_reading};
pub use tracker::{DEFAULT_SENSORS, SensorState, Tracker};
