use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use binlog_core::{Argument, LogMessage, LpString, Severity, Tracker, encode_frame, format_line};

const SENSOR_FILE: &str = "devices/distance_sensor.h";
const SENSOR_LINE: u16 = 57;
const SENSOR_PERIOD_MICROS: u32 = 60_000;

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

/// Writes `<root>/<case>/input.bin` and the matching `expected.txt`.
fn run() -> Result<(), String> {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests").join("golden"));

    let log_lines = log_line_messages();
    let rendered = log_lines.iter().map(format_line).collect::<Vec<_>>();
    write_case(&root.join("log_lines"), &log_lines, &rendered)?;

    let distances = distance_messages();
    let mut tracker = Tracker::default();
    let mut rendered = Vec::with_capacity(distances.len());
    for message in &distances {
        tracker
            .on_message(message)
            .map_err(|err| format!("fixture reading rejected: {}", err))?;
        rendered.push(tracker.render());
    }
    write_case(&root.join("distances"), &distances, &rendered)?;
    Ok(())
}

fn log_line_messages() -> Vec<LogMessage> {
    vec![
        LogMessage {
            severity: Severity::Info,
            micros: 1_234_567,
            file_name: LpString::from("a.c"),
            line_number: 10,
            args: vec![Argument::UInt8(5)],
        },
        LogMessage {
            severity: Severity::Info,
            micros: 65_535,
            file_name: LpString::from("dir/file.cc"),
            line_number: 15,
            args: vec![
                Argument::String(LpString::from("abc")),
                Argument::String(LpString::from("sv")),
                Argument::UInt16(2),
            ],
        },
        LogMessage {
            severity: Severity::Fatal,
            micros: 98_000_001,
            file_name: LpString::from("os/scheduler.h"),
            line_number: 120,
            args: vec![
                Argument::String(LpString::from("queue full: ")),
                Argument::UInt32(4_096),
            ],
        },
    ]
}

fn distance_messages() -> Vec<LogMessage> {
    let sensors = [("left", 412u16), ("front", 1_250), ("right", 87)];
    let mut messages = Vec::new();
    for round in 0..4u32 {
        for (slot, (id, distance)) in sensors.iter().enumerate() {
            let trig_low = round * SENSOR_PERIOD_MICROS * 3 + slot as u32 * SENSOR_PERIOD_MICROS;
            let echo_high = trig_low + 450;
            let echo_low = echo_high + u32::from(*distance) * 58 / 10;
            messages.push(LogMessage {
                severity: Severity::Info,
                micros: echo_low + 20,
                file_name: LpString::from(SENSOR_FILE),
                line_number: SENSOR_LINE,
                args: vec![
                    Argument::String(LpString::from(*id)),
                    Argument::UInt16(*distance + round as u16),
                    Argument::UInt32(trig_low),
                    Argument::UInt32(echo_high),
                    Argument::UInt32(echo_low),
                ],
            });
        }
    }
    messages
}

fn write_case(dir: &Path, messages: &[LogMessage], rendered: &[String]) -> Result<(), String> {
    fs::create_dir_all(dir)
        .map_err(|err| format!("failed to create {}: {}", dir.display(), err))?;

    let mut bytes = Vec::new();
    for message in messages {
        let frame = encode_frame(message)
            .map_err(|err| format!("failed to encode fixture message: {}", err))?;
        bytes.extend_from_slice(&frame);
    }
    let input = dir.join("input.bin");
    fs::write(&input, bytes)
        .map_err(|err| format!("failed to write {}: {}", input.display(), err))?;

    let mut expected = rendered.join("\n");
    expected.push('\n');
    let output = dir.join("expected.txt");
    fs::write(&output, expected)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))
}
