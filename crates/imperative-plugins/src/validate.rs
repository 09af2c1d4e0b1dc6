use std::fmt::Write;

use tracing::debug;

use crate::error::PluginError;
use crate::issues::{IssueSeverity, PluginIssues};
use crate::response::ConsoleResponse;
use crate::validator::PluginValidator;

pub const NO_PLUGINS_INSTALLED: &str = "No plugins have been installed into your CLI application.";

/// What a validation run found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub validated: Vec<String>,
    pub with_errors: Vec<String>,
    pub not_installed: Vec<String>,
}

impl ValidationSummary {
    /// `true` when every requested plugin is installed and free of errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.with_errors.is_empty() && self.not_installed.is_empty()
    }
}

/// Handler for `plugins validate`.
pub struct ValidateHandler<'a> {
    issues: &'a PluginIssues,
}

impl<'a> ValidateHandler<'a> {
    #[must_use]
    pub fn new(issues: &'a PluginIssues) -> Self {
        Self { issues }
    }

    /// Validate the `requested` plugins, or every installed plugin when no
    /// non-empty name is given, and report the results on `response`.
    ///
    /// # Errors
    ///
    /// Fails when the installed plugins cannot be read.
    pub fn process(
        &self,
        requested: &[String],
        response: &mut dyn ConsoleResponse,
    ) -> Result<ValidationSummary, PluginError> {
        let installed = self.issues.installed_plugins()?;
        let mut summary = ValidationSummary::default();

        if installed.is_empty() {
            response.log(NO_PLUGINS_INSTALLED);
            return Ok(summary);
        }

        let requested: Vec<&str> = requested
            .iter()
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .collect();
        let names: Vec<&str> = if requested.is_empty() {
            installed.keys().map(String::as_str).collect()
        } else {
            requested
        };
        debug!(plugins = ?names, "validating plugins");

        let validator = PluginValidator::new(self.issues);
        for name in names {
            let Some(plugin) = installed.get(name) else {
                response.error(&format!(
                    "The specified plugin '{name}' has not been installed into your CLI application."
                ));
                summary.not_installed.push(name.to_string());
                continue;
            };

            if !validator.validate(name, plugin) {
                summary.with_errors.push(name.to_string());
            }
            self.display_plugin_issues(name, response);
            summary.validated.push(name.to_string());
        }

        Ok(summary)
    }

    /// Write the issues currently recorded for `plugin` as a single message.
    pub fn display_plugin_issues(&self, plugin: &str, response: &mut dyn ConsoleResponse) {
        let issues = self.issues.issues_for_plugin(plugin);
        let mut message = format!("\nValidation results for plugin '{plugin}':");

        if issues.is_empty() {
            message.push_str("\nSuccessfully validated.");
        } else {
            for issue in &issues {
                let _ = write!(message, "\n{}: {}", issue.severity, issue.text);
            }
            if issues
                .iter()
                .any(|issue| issue.severity == IssueSeverity::Error)
            {
                message.push_str(
                    "\nThis plugin has errors. No commands from this plugin will be available \
                     for future commands.",
                );
            }
        }

        response.log(&message);
    }
}
