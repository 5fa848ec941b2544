//! Structured logging for ADRN
//!
//! The engine's primary output channel (stdout) carries only protocol text,
//! so every log sink configured here writes to stderr or to a file.
//!
//! # Features
//!
//! - **Pretty or JSONL console output** on stderr
//! - **File output** with daily/hourly rotation via tracing-appender
//! - **RUST_LOG override** of the configured default level
//!
//! # Quick Start
//!
//! ```ignore
//! use adrn_logging::{AdrnSubscriberBuilder, LogConfig};
//!
//! // Warnings and above, human-readable, on stderr
//! let _guard = AdrnSubscriberBuilder::new().init()?;
//!
//! // Verbose development output
//! let _guard = AdrnSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//! ```

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use std::fs::{self, File};
use std::io;

use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Errors setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to prepare log file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Keeps the background file writer alive; drop it last to flush
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Builder for configuring and initializing the ADRN logging subscriber
pub struct AdrnSubscriberBuilder {
    config: LogConfig,
}

impl AdrnSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    ///
    /// Default: warnings and above, pretty format, stderr
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Switch console output between pretty and JSONL
    pub fn with_json_console(mut self, json: bool) -> Self {
        self.config.console.pretty = !json;
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Assemble the subscriber without installing it
    pub fn build(self) -> Result<(impl Subscriber + Send + Sync + 'static, LogGuard), LoggingError> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.config.default_level)
                .map_err(|e| LoggingError::Filter(e.to_string()))?,
        };

        let console = &self.config.console;
        let jsonl = &self.config.jsonl;

        let pretty_console = (console.enabled && console.pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(console.ansi)
                .with_target(true)
        });

        let json_console = (console.enabled && !console.pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(jsonl.include_spans)
                .flatten_event(jsonl.flatten_events)
                .with_file(jsonl.include_location)
                .with_line_number(jsonl.include_location)
        });

        let (file_layer, file_guard) = match &self.config.file {
            Some(file_config) => {
                let (writer, guard) = create_file_writer(file_config)?;
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .with_writer(writer);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        let subscriber = Registry::default()
            .with(env_filter)
            .with(pretty_console)
            .with(json_console)
            .with(file_layer);

        Ok((subscriber, LogGuard { _file: file_guard }))
    }

    /// Initialize the subscriber globally
    ///
    /// The returned guard must be kept alive for the duration of the program
    /// when file output is enabled.
    pub fn init(self) -> Result<LogGuard, LoggingError> {
        let (subscriber, guard) = self.build()?;
        subscriber
            .try_init()
            .map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))?;
        Ok(guard)
    }
}

impl Default for AdrnSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncates a single file for `Never`, appends through a rolling appender otherwise
fn create_file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&config.directory)?;
    let pair = match config.rotation {
        RotationStrategy::Never => {
            let path = config.directory.join(format!("{}.log", config.prefix));
            tracing_appender::non_blocking(File::create(path)?)
        }
        RotationStrategy::Daily => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::DAILY,
            &config.directory,
            &config.prefix,
        )),
        RotationStrategy::Hourly => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::HOURLY,
            &config.directory,
            &config.prefix,
        )),
    };
    Ok(pair)
}
