//! Tracks problems found in installed plugins and reports them to the user.
//!
//! [`PluginIssues`] is the registry of issues per plugin, [`PluginValidator`]
//! inspects an installed plugin and records what is wrong with it, and
//! [`ValidateHandler`] drives validation for a command and writes the results
//! to a [`ConsoleResponse`].

mod error;
mod issues;
mod response;
mod validate;
mod validator;

pub use error::PluginError;
pub use issues::{InstalledPlugin, IssueSeverity, PluginIssue, PluginIssues};
pub use response::{BufferedResponse, ConsoleResponse, StdResponse};
pub use validate::{NO_PLUGINS_INSTALLED, ValidateHandler, ValidationSummary};
pub use validator::PluginValidator;
