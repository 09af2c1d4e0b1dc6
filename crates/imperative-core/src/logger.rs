use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::ImperativeError;

pub const IMPERATIVE_CATEGORY: &str = "imperative";
pub const APP_CATEGORY: &str = "app";

/// Logging section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Install the process-wide `tracing` subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level. When the log file
/// cannot be opened, events go to stderr and a warning is logged once the
/// subscriber is up.
///
/// # Errors
///
/// Fails when the configured level is not a known level, or when a global
/// subscriber is already installed.
pub fn init_logger(config: &LoggingConfig) -> Result<Logger, ImperativeError> {
    let level: LevelFilter = config.level.parse().map_err(|error| {
        ImperativeError::new(format!("invalid log level '{}'", config.level)).with_cause(error)
    })?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let (writer, ansi, unopened) = match &config.file {
        Some(path) => match open_log_file(path) {
            Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), false, None),
            Err(error) => (BoxMakeWriter::new(std::io::stderr), true, Some((path, error))),
        },
        None => (BoxMakeWriter::new(std::io::stderr), true, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi),
        )
        .try_init()
        .map_err(|error| {
            ImperativeError::new("a global logger is already installed").with_cause(error)
        })?;

    let logger = Logger::imperative();
    if let Some((path, error)) = unopened {
        logger.warn(format_args!(
            "could not open log file {}, logging to stderr: {error}",
            path.display()
        ));
    }
    Ok(logger)
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Category-tagged logging facade.
///
/// Every method formats its arguments, emits the event and returns the
/// formatted message so callers can reuse it, for example in an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    category: String,
}

impl Logger {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    #[must_use]
    pub fn imperative() -> Self {
        Self::category(IMPERATIVE_CATEGORY)
    }

    #[must_use]
    pub fn app() -> Self {
        Self::category(APP_CATEGORY)
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category
    }

    pub fn trace(&self, args: fmt::Arguments<'_>) -> String {
        let message = args.to_string();
        tracing::trace!(category = %self.category, "{message}");
        message
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) -> String {
        let message = args.to_string();
        tracing::debug!(category = %self.category, "{message}");
        message
    }

    pub fn info(&self, args: fmt::Arguments<'_>) -> String {
        let message = args.to_string();
        tracing::info!(category = %self.category, "{message}");
        message
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) -> String {
        let message = args.to_string();
        tracing::warn!(category = %self.category, "{message}");
        message
    }

    pub fn error(&self, args: fmt::Arguments<'_>) -> String {
        let message = args.to_string();
        tracing::error!(category = %self.category, "{message}");
        message
    }

    /// `tracing` has no fatal level; fatal events are errors tagged `fatal = true`.
    pub fn fatal(&self, args: fmt::Arguments<'_>) -> String {
        let message = args.to_string();
        tracing::error!(category = %self.category, fatal = true, "{message}");
        message
    }

    /// Log at info level without the category tag.
    pub fn simple(&self, args: fmt::Arguments<'_>) -> String {
        let message = args.to_string();
        tracing::info!("{message}");
        message
    }

    /// Report every part of `error`: details, stack, causes, then the message.
    pub fn log_error(&self, error: &ImperativeError) {
        if let Some(details) = error.additional_details() {
            self.error(format_args!("{details}"));
        }
        if let Some(stack) = error.stack() {
            self.error(format_args!("{stack}"));
        }
        for cause in error.causes() {
            self.error(format_args!("Cause error:\n{cause:?}"));
        }
        self.error(format_args!("{}", error.message()));
    }
}
