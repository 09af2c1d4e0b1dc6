//! Shared building blocks for the imperative crates: a structured
//! [`ImperativeError`] and a category-tagged [`Logger`] over `tracing`.

pub mod error;
pub mod logger;

pub use error::{Cause, ImperativeError, Result};
pub use logger::{APP_CATEGORY, IMPERATIVE_CATEGORY, Logger, LoggingConfig, init_logger};
