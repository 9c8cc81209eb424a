//! Logging and tracing setup for the lazygrid binary
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! JSON logs are written to a daily rolling file when enabled. `RUST_LOG`
//! takes precedence over the configured filter.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where JSON log files are written
    pub log_dir: PathBuf,

    pub enable_json_logs: bool,

    pub enable_console_logs: bool,

    /// Whether to include file/line information in console logs
    pub include_location: bool,

    /// Whether to log span open/close (fetch timing)
    pub enable_spans: bool,

    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: false,
            enable_spans: false,
            default_filter: filter_for(0),
        }
    }
}

impl LoggingConfig {
    /// Configuration for a CLI run with `-v` repeated `verbosity` times
    pub fn for_cli(verbosity: u8, json_logs: bool) -> Self {
        Self {
            enable_json_logs: json_logs,
            include_location: verbosity >= 2,
            enable_spans: verbosity >= 2,
            default_filter: filter_for(verbosity),
            ..Self::default()
        }
    }
}

fn filter_for(verbosity: u8) -> String {
    let crates = "lazygrid=LEVEL,lazygrid_core=LEVEL,lazygrid_table=LEVEL,lazygrid_interchange=LEVEL,lazygrid_settings=LEVEL";
    let level = match verbosity {
        0 => return "warn".to_string(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,{}", crates.replace("LEVEL", level))
}

/// Initialize the global subscriber.
///
/// The returned guard flushes the JSON file writer and must be held until
/// the program exits.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    // NEW fires once per span; ENTER would repeat on every re-poll of an
    // awaited fetch.
    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers = Vec::new();
    let mut guard = None;

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events.clone())
            .with_ansi(true)
            .pretty()
            .with_filter(env_filter.clone())
            .boxed();

        layers.push(console_layer);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "lazygrid.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();

        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        console_enabled = config.enable_console_logs,
        "Logging initialized"
    );

    Ok(guard)
}

pub fn log_directory() -> PathBuf {
    lazygrid_settings::logs_dir().unwrap_or_else(|_| PathBuf::from("logs"))
}
