use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use binlog_core::{CancelToken, SessionConfig, load_config, open_input};
use clap::{Parser, Subcommand};
use glob::glob;

mod consume;
mod logging;

use consume::{OutputFormat, Summary};
use logging::{LogFormat, LogLevel, init_logging};

const STDIN_ARG: &str = "-";
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BINLOG_BUILD_COMMIT"),
    " ",
    env!("BINLOG_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "binlog")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for framed binary log streams from microcontroller firmware.",
    long_about = None,
    after_help = "Examples:\n  binlog read capture.bin\n  binlog read /dev/ttyUSB0 --format distances\n  cat capture.bin | binlog read - --format json"
)]
struct Cli {
    /// Diagnostic log level (stderr)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a capture file, device node or stdin and print one line per unit.
    #[command(alias = "decode")]
    Read {
        /// Capture file or device node, a glob matching one file, or - for stdin
        input: PathBuf,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "binary")]
        format: OutputFormat,

        /// JSON session config (sensor ids)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Comma-separated distance sensor ids, in display order (overrides --config)
        #[arg(long, value_delimiter = ',')]
        sensors: Option<Vec<String>>,

        /// Suppress the end-of-stream summary
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = match cli.command {
        Commands::Read {
            input,
            format,
            config,
            sensors,
            quiet,
        } => cmd_read(input, format, config, sensors, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_read(
    input: PathBuf,
    format: OutputFormat,
    config: Option<PathBuf>,
    sensors: Option<Vec<String>>,
    quiet: bool,
) -> Result<(), CliError> {
    let session = resolve_session(config.as_deref(), sensors)?;
    let input = resolve_input_path(&input)?;
    validate_input(&input)?;

    let source = open_input(&input)
        .with_context(|| format!("Failed to open input: {}", input.display()))?;
    let cancel = install_cancel_handler()?;
    tracing::info!(input = %input.display(), ?format, "reading stream");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = consume::run(format, source, &mut out, &session.sensors, &cancel)?;

    if !quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn resolve_session(
    config: Option<&Path>,
    sensors: Option<Vec<String>>,
) -> Result<SessionConfig, CliError> {
    let mut session = match config {
        Some(path) => load_config(path).map_err(|err| {
            CliError::new(
                format!("failed to load config {}: {}", path.display(), err),
                Some("expected JSON like {\"sensors\": [\"left\", \"front\"]}".to_string()),
            )
        })?,
        None => SessionConfig::default(),
    };
    if let Some(sensors) = sensors {
        session.sensors = sensors;
    }
    session.validate().map_err(|err| {
        CliError::new(
            format!("invalid sensor list: {err}"),
            Some("pass distinct ids, e.g. --sensors left,front,right".to_string()),
        )
    })?;
    Ok(session)
}

fn install_cancel_handler() -> Result<CancelToken, CliError> {
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        // A read may be blocked on an idle device; a second Ctrl-C exits at once.
        if handler_token.is_cancelled() {
            std::process::exit(130);
        }
        handler_token.cancel();
    })
    .context("Failed to install Ctrl-C handler")?;
    Ok(cancel)
}

fn print_summary(summary: &Summary) {
    let mut line = format!("OK: {} {}", summary.count, summary.unit);
    if summary.trailing_bytes > 0 {
        line.push_str(&format!(
            " ({} trailing payload bytes ignored)",
            summary.trailing_bytes
        ));
    }
    if summary.cancelled {
        line.push_str(" (interrupted)");
    }
    eprintln!("{line}");
}

fn validate_input(input: &Path) -> Result<(), CliError> {
    if input.as_os_str() == STDIN_ARG {
        return Ok(());
    }
    if !input.exists() {
        return Err(CliError::new(
            format!("input not found: {}", input.display()),
            Some("pass a capture file, a serial device node, or - for stdin".to_string()),
        ));
    }
    let meta = fs::metadata(input)
        .with_context(|| format!("Failed to read input metadata: {}", input.display()))?;
    if meta.is_dir() {
        return Err(CliError::new(
            format!("input is a directory: {}", input.display()),
            Some("pass a capture file, a serial device node, or - for stdin".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let more = if count > 3 { ", ..." } else { "" };
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}{}",
                    pattern, count, listed, more
                ),
                Some("pass a single capture, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
