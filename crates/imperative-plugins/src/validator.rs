use semver::Version;
use tracing::debug;
use url::Url;

use crate::issues::{InstalledPlugin, IssueSeverity, PluginIssues};

/// Checks an installed plugin's metadata and records what is wrong with it.
pub struct PluginValidator<'a> {
    issues: &'a PluginIssues,
}

impl<'a> PluginValidator<'a> {
    #[must_use]
    pub fn new(issues: &'a PluginIssues) -> Self {
        Self { issues }
    }

    /// Replace the recorded issues for `name` with the result of a fresh check.
    ///
    /// Returns `true` when no error was found. Warnings do not make a plugin invalid.
    pub fn validate(&self, name: &str, plugin: &InstalledPlugin) -> bool {
        self.issues.remove_issues_for_plugin(name);

        if plugin.package.trim().is_empty() {
            self.issues.record_issue(
                name,
                IssueSeverity::Error,
                "The plugin's package location is not specified.",
            );
        }

        if let Err(error) = Version::parse(&plugin.version) {
            self.issues.record_issue(
                name,
                IssueSeverity::Error,
                format!(
                    "The plugin's version '{}' is not a valid semantic version: {error}",
                    plugin.version
                ),
            );
        }

        if plugin.registry.trim().is_empty() {
            self.issues.record_issue(
                name,
                IssueSeverity::Warning,
                "No registry is recorded for the plugin.",
            );
        } else if let Err(error) = Url::parse(&plugin.registry) {
            self.issues.record_issue(
                name,
                IssueSeverity::Warning,
                format!(
                    "The plugin's registry '{}' is not a valid URL: {error}",
                    plugin.registry
                ),
            );
        }

        let valid = !self.issues.does_plugin_have_error(name);
        debug!(plugin = name, valid, "validated plugin");
        valid
    }
}
