//! Logging setup
//!
//! Console output (compact or JSON) plus an optional daily-rotated log file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, Layer, Registry};

/// Log filter variable, checked before `RUST_LOG`
pub const LOG_ENV: &str = "PROJECTOR_LOG";
/// Set to `json` for JSON console output
pub const LOG_FORMAT_ENV: &str = "PROJECTOR_LOG_FORMAT";

/// Keeps the file writer alive; drop it last to flush buffered lines
pub use tracing_appender::non_blocking::WorkerGuard as LogGuard;

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub console_enabled: bool,
    pub file_enabled: bool,
    /// Directory for log files; the platform data directory when unset
    pub log_dir: Option<PathBuf>,
    pub json_format: bool,
    /// Filter used when no environment override is set
    pub default_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            file_enabled: false,
            log_dir: None,
            json_format: false,
            default_level: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Directory log files go to
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|p| p.join("ProjectorDisplay").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

/// Errors from logging setup
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Cannot create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot open log file: {0}")]
    Appender(#[from] InitError),
    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Whether the console layer should emit JSON
fn json_requested(env_value: Option<&str>, config: &LogConfig) -> bool {
    match env_value {
        Some(value) => value.eq_ignore_ascii_case("json"),
        None => config.json_format,
    }
}

fn console_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer().compact().with_target(true).boxed()
    }
}

/// Install the global subscriber
///
/// The filter comes from `PROJECTOR_LOG`, then `RUST_LOG`, then
/// `config.default_level`. Returns a guard when file logging is on; keep it
/// alive until shutdown.
pub fn init_logging(config: &LogConfig) -> Result<Option<LogGuard>, LoggingError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level));
    let json = json_requested(std::env::var(LOG_FORMAT_ENV).ok().as_deref(), config);

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.console_enabled {
        layers.push(console_layer(json));
    }

    let mut guard: Option<LogGuard> = None;
    let log_dir = config.resolved_log_dir();
    if config.file_enabled {
        std::fs::create_dir_all(&log_dir).map_err(|source| LoggingError::LogDir {
            path: log_dir.clone(),
            source,
        })?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("projector-display")
            .filename_suffix("log")
            .build(&log_dir)?;
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard = Some(file_guard);
        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(filter).with(layers).try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        json,
        file_enabled = config.file_enabled,
        log_dir = %log_dir.display(),
        "Logging initialized"
    );
    Ok(guard)
}
