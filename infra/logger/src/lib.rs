//! # Logger
//!
//! Diagnostic logging for the drvreg tools.
//!
//! Generated artifacts and the primary error message are the tool's real output, so
//! everything logged here goes to **stderr** (and optionally to a plain log file),
//! never to stdout.
//!
//! * Console output uses the compact formatter, with ANSI colors only when stderr is
//!   a terminal (override with [`LoggerBuilder::ansi`]).
//! * `RUST_LOG` still applies on top of the configured level unless an explicit
//!   [`LoggerBuilder::env_filter`] is given.
//! * [`LoggerBuilder::log_dir`] adds a non-blocking file layer writing
//!   `<dir>/<name>.log`. The file is never rotated; one run appends to it.
//!
//! ## Example
//!
//! ```rust
//! # use drvreg_logger::Logger;
//! let _logger = Logger::builder()
//!     .name("drvreg")
//!     .verbosity(1, false)
//!     .init()
//!     .unwrap();
//!
//! tracing::info!("ready");
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use private::Sealed;
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    ansi: Option<bool>,
    log_dir: Option<PathBuf>,
    level: LevelFilter,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { console: true, ansi: None, log_dir: None, level: LevelFilter::WARN, env_filter: None }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// Configures and installs the global tracing subscriber.
///
/// A name is required before [`LoggerBuilder::init`] becomes available; it tags the
/// log file and is checked for emptiness.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the logger name (also the log file stem).
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl<N: Sealed> LoggerBuilder<N> {
    /// Sets the minimum level emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Derives the level from CLI-style flags.
    ///
    /// `quiet` wins over any verbosity and yields `ERROR`. Otherwise zero maps to
    /// `WARN`, one to `INFO`, two to `DEBUG` and anything above to `TRACE`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn verbosity(self, verbose: u8, quiet: bool) -> Self {
        self.level(level_for(verbose, quiet))
    }

    /// Adds an explicit filter directive (e.g., `drvreg_registry=trace`).
    ///
    /// When set, `RUST_LOG` is ignored. Invalid directives make
    /// [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables the stderr layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Forces ANSI colors on or off for the stderr layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.config.ansi = Some(enabled);
        self
    }

    /// Writes a copy of the logs into `<dir>/<name>.log`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = Some(dir.into());
        self
    }
}

impl LoggerBuilder<WithName> {
    /// Installs the global subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle owning the file writer guard, if any. Keep it alive until
    /// the process exits so buffered lines get flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, a bad filter, or no
    ///   enabled output.
    /// * [`LoggerError::Internal`] if the log directory cannot be created.
    /// * [`LoggerError::Appender`] if the log file cannot be opened.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        if name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }

        let env_filter = build_env_filter(&self.config)?;
        let mut layers = Vec::new();

        if self.config.console {
            let ansi = self.config.ansi.unwrap_or_else(|| std::io::stderr().is_terminal());
            layers.push(
                layer().compact().with_target(false).with_ansi(ansi).with_writer(std::io::stderr).boxed(),
            );
        }

        let guard = if let Some(dir) = self.config.log_dir {
            fs::create_dir_all(&dir).map_err(|e| LoggerError::Internal {
                message: e.to_string().into(),
                context: Some(format!("Failed to create log directory: {}", dir.display()).into()),
            })?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(&name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(&dir)
                .context(format!("Log directory: {}", dir.display()))?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(layer().with_writer(writer).with_ansi(false).boxed());
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging output enabled. Enable the console or set a log directory."
                    .into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background log file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a fresh [`LoggerBuilder`] with a `WARN` default level and console on.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// Whether a log file writer is attached.
    #[must_use]
    pub const fn has_file(&self) -> bool {
        self.guard.is_some()
    }
}

const fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}
