use imperative_plugins::{PluginIssues, StdResponse, ValidateHandler};
use tracing::debug;

use crate::config::PluginsConfig;
use crate::error::{CliError, Result};

pub(crate) fn validate(config: &PluginsConfig, requested: &[String]) -> Result<()> {
    let issues = PluginIssues::instance();
    issues.set_plugins_file(&config.file);
    debug!(file = %config.file.display(), "validating installed plugins");

    let summary = ValidateHandler::new(issues).process(requested, &mut StdResponse)?;

    let failed = summary.with_errors.len() + summary.not_installed.len();
    if failed > 0 {
        return Err(CliError::PluginValidation { failed });
    }
    Ok(())
}
