use std::io::{self, BufRead, BufReader, Read, Write};

use binlog_core::{
    CancelToken, DecodeError, DecoderState, LogMessage, MessageDecoder, ReaderSource, Tracker,
    TrackerError, format_hex_byte, format_line,
};
use clap::ValueEnum;
use serde::Serialize;

use crate::CliError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw text lines, passed through unchanged
    Lines,
    /// One `0x..` hex byte per line
    Chars,
    /// Decoded log lines
    Binary,
    /// Distance sensor status lines
    Distances,
    /// One JSON object per decoded message
    Json,
}

#[derive(Debug)]
pub struct Summary {
    pub count: u64,
    pub unit: &'static str,
    pub trailing_bytes: u64,
    pub cancelled: bool,
}

#[derive(Serialize)]
struct MessageRecord<'a> {
    frame: u64,
    #[serde(flatten)]
    message: &'a LogMessage,
}

/// Feeds `source` to the consumer selected by `format`.
///
/// Output already written is flushed before any error is returned.
pub fn run<R: Read, W: Write>(
    format: OutputFormat,
    source: ReaderSource<R>,
    out: &mut W,
    sensors: &[String],
    cancel: &CancelToken,
) -> Result<Summary, CliError> {
    let result = match format {
        OutputFormat::Lines => passthrough_lines(source.into_inner(), out, cancel),
        OutputFormat::Chars => passthrough_hex(source.into_inner(), out, cancel),
        OutputFormat::Binary => {
            let mut decoder = MessageDecoder::new(source).with_cancel(cancel.clone());
            for_each_message(&mut decoder, out, |msg, _| Ok(format_line(msg)))
        }
        OutputFormat::Distances => {
            let mut decoder = MessageDecoder::new(source).with_cancel(cancel.clone());
            let mut tracker = Tracker::new(sensors.iter().cloned()).map_err(tracker_error)?;
            for_each_message(&mut decoder, out, |msg, _| {
                tracker.on_message(msg).map_err(tracker_error)?;
                Ok(tracker.render())
            })
        }
        OutputFormat::Json => {
            let mut decoder = MessageDecoder::new(source).with_cancel(cancel.clone());
            for_each_message(&mut decoder, out, |message, frame| {
                serde_json::to_string(&MessageRecord { frame, message }).map_err(|err| {
                    CliError::new(format!("JSON serialization failed: {err}"), None)
                })
            })
        }
    };

    let flushed = out.flush();
    let summary = result?;
    flushed.map_err(write_error)?;
    Ok(summary)
}

fn for_each_message<R, W, F>(
    decoder: &mut MessageDecoder<ReaderSource<R>>,
    out: &mut W,
    mut render: F,
) -> Result<Summary, CliError>
where
    R: Read,
    W: Write,
    F: FnMut(&LogMessage, u64) -> Result<String, CliError>,
{
    while let Some(message) = decoder
        .next_message()
        .map_err(|err| decode_error(err, decoder.frames_decoded()))?
    {
        let line = render(&message, decoder.frames_decoded())?;
        writeln!(out, "{line}").map_err(write_error)?;
    }

    Ok(Summary {
        count: decoder.frames_decoded(),
        unit: "frames decoded",
        trailing_bytes: decoder.trailing_bytes(),
        cancelled: decoder.state() == DecoderState::Cancelled,
    })
}

fn passthrough_lines<R: Read, W: Write>(
    reader: R,
    out: &mut W,
    cancel: &CancelToken,
) -> Result<Summary, CliError> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut count = 0;
    while !cancel.is_cancelled() {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(read_error)? == 0 {
            break;
        }
        out.write_all(&line).map_err(write_error)?;
        count += 1;
    }
    Ok(Summary {
        count,
        unit: "lines read",
        trailing_bytes: 0,
        cancelled: cancel.is_cancelled(),
    })
}

fn passthrough_hex<R: Read, W: Write>(
    reader: R,
    out: &mut W,
    cancel: &CancelToken,
) -> Result<Summary, CliError> {
    let mut count = 0;
    for byte in BufReader::new(reader).bytes() {
        if cancel.is_cancelled() {
            break;
        }
        writeln!(out, "{}", format_hex_byte(byte.map_err(read_error)?)).map_err(write_error)?;
        count += 1;
    }
    Ok(Summary {
        count,
        unit: "bytes read",
        trailing_bytes: 0,
        cancelled: cancel.is_cancelled(),
    })
}

fn decode_error(err: DecodeError, frames: u64) -> CliError {
    let hint = match &err {
        DecodeError::TruncatedFrame { .. } => {
            "the stream ended mid-frame, or it is not a binary log capture"
        }
        DecodeError::UnknownSeverity { .. } | DecodeError::UnknownArgumentType { .. } => {
            "the stream is corrupted or was opened mid-frame; decoding cannot resynchronize"
        }
        DecodeError::Source(_) | DecodeError::Terminated => "check that the input is readable",
    };
    CliError::new(
        format!("decode failed after {frames} frames: {err}"),
        Some(hint.to_string()),
    )
}

fn tracker_error(err: TrackerError) -> CliError {
    let hint = match &err {
        TrackerError::UnknownSensor { .. } => "list the sensor with --sensors or in --config",
        TrackerError::DuplicateSensor { .. } => {
            "pass distinct ids, e.g. --sensors left,front,right"
        }
        TrackerError::Schema(_) => "the stream carries messages other than distance readings",
        TrackerError::Decode(_) => "check that the input is a binary log capture",
    };
    CliError::new(err.to_string(), Some(hint.to_string()))
}

fn read_error(err: io::Error) -> CliError {
    CliError::new(format!("failed to read input: {err}"), None)
}

fn write_error(err: io::Error) -> CliError {
    CliError::new(format!("failed to write output: {err}"), None)
}
