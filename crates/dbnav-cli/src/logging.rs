//! Logging and tracing setup for the dbnav CLI
//!
//! Console output goes to stderr so generated statements on stdout stay
//! clean. An optional JSON layer writes daily-rotated files for bug reports.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where JSON log files are written
    pub log_dir: PathBuf,

    /// Whether to write JSON logs to files
    pub enable_json_logs: bool,

    /// Whether to include file/line information in console logs
    pub include_location: bool,

    /// Filter used when RUST_LOG is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: false,
            include_location: false,
            default_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Map `-v` occurrences to a filter: warn, then debug, then trace
    pub fn for_verbosity(verbose: u8, json_logs: bool) -> Self {
        let default_filter = match verbose {
            0 => "warn",
            1 => "info,dbnav_core=debug,dbnav_dialects=debug,dbnav=debug",
            _ => "trace",
        };
        Self {
            enable_json_logs: json_logs,
            include_location: verbose > 1,
            default_filter: default_filter.to_string(),
            ..Self::default()
        }
    }
}

/// Initialize the global subscriber.
///
/// Returns the file writer guard when JSON logs are enabled; keep it alive
/// until exit so buffered lines are flushed.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    // RUST_LOG takes precedence over the configured filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers = Vec::new();

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone())
        .boxed();
    layers.push(console_layer);

    let mut guard = None;
    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "dbnav.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        "logging initialized"
    );

    Ok(guard)
}

/// Directory for JSON log files
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dbnav")
        .join("logs")
}
