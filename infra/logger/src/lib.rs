//! # Logger
//!
//! Installs the process-wide `tracing` subscriber used by the admin binaries.
//! Console output is compact and colored; file output goes through a non-blocking
//! rolling appender and may be written as JSON lines.
//! `RUST_LOG` is honored unless [`LoggerBuilder::env_filter`] supplies explicit directives.
//!
//! ## Example
//!
//! ```rust
//! use sfa_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("sfa-admin")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// File sink settings; present only when a log directory was configured.
#[derive(Debug)]
struct FileSink {
    directory: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

/// Builder for the global subscriber.
#[derive(Debug)]
#[must_use = "The builder must be initialized with .init()"]
pub struct LoggerBuilder {
    name: String,
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    file: Option<FileSink>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            console: true,
            level: LevelFilter::INFO,
            env_filter: None,
            file: None,
        }
    }
}

impl LoggerBuilder {
    /// Application name, also used as the log file prefix.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Programmatic filter directives such as `sfa_bootstrap=debug`.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables rolling file output into `directory`.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.file = Some(FileSink {
            directory: directory.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        });
        self
    }

    /// Rotation of the file sink. Ignored without [`LoggerBuilder::directory`].
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = self.file.as_mut() {
            file.rotation = rotation;
        }
        self
    }

    /// Retained file count of the file sink. Ignored without [`LoggerBuilder::directory`].
    pub fn max_files(mut self, max_files: usize) -> Self {
        if let Some(file) = self.file.as_mut() {
            file.max_files = max_files;
        }
        self
    }

    /// Writes the file sink as JSON lines. Ignored without [`LoggerBuilder::directory`].
    pub fn json(mut self) -> Self {
        if let Some(file) = self.file.as_mut() {
            file.json = true;
        }
        self
    }

    /// Installs the subscriber.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`,
    ///   a malformed filter or when no output is enabled.
    /// * [`LoggerError::Subscriber`] when a global subscriber already exists.
    /// * [`LoggerError::Appender`] / [`LoggerError::Internal`] when the log directory is unusable.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let filter = self.build_filter()?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        if self.console {
            layers.push(fmt::layer().compact().with_ansi(true).boxed());
        }

        let guard = match self.file {
            Some(sink) => {
                let (layer, guard) = file_layer(&self.name, sink)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No output enabled, turn on the console or set a log directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }
        if self.file.as_ref().is_some_and(|f| f.max_files == 0) {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }
        Ok(())
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid env filter '{directives}': {e}").into(),
                    context: None,
                })
            },
        }
    }
}

fn file_layer(name: &str, sink: FileSink) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&sink.directory).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create {}", sink.directory.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(sink.rotation)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(sink.max_files)
        .build(&sink.directory)
        .context(format!("Log directory {}", sink.directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if sink.json { layer.json().boxed() } else { layer.boxed() };

    Ok((layer, guard))
}

/// Handle to the installed subscriber. Keep it alive until shutdown so buffered
/// file output is flushed.
#[must_use = "Dropping this handle stops the background log writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// `true` when a file sink with a background writer is active.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log files");
        }
    }
}
