use std::path::PathBuf;

use imperative_core::ImperativeError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PluginError {
    #[error("failed to read installed plugins from '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse installed plugins at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<PluginError> for ImperativeError {
    fn from(error: PluginError) -> Self {
        let imperative = ImperativeError::new(error.to_string());
        let imperative = match &error {
            PluginError::Parse { .. } => imperative.with_details(
                "Installed plugins must be a JSON object mapping each plugin name to \
                 its package, registry and version.",
            ),
            PluginError::Read { .. } => imperative,
        };
        imperative.with_cause(error)
    }
}
