use std::path::PathBuf;

use imperative_core::ImperativeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read configuration at '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration at '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to initialise logging")]
    Logging(#[source] ImperativeError),

    #[error("profile lookup failed")]
    Profiles(#[from] imperative_profiles::ProfilesError),

    #[error("plugin registry error")]
    Plugins(#[from] imperative_plugins::PluginError),

    #[error("failed to render JSON output")]
    Json(#[from] serde_json::Error),

    #[error("{failed} plugin(s) failed validation")]
    PluginValidation { failed: usize },
}

impl CliError {
    /// Extra context worth showing below the error chain.
    pub(crate) fn additional_details(&self) -> Option<String> {
        match self {
            Self::Profiles(error) => error.additional_details(),
            _ => None,
        }
    }

    /// The structured form written to the log file.
    pub(crate) fn into_imperative(self) -> ImperativeError {
        match self {
            Self::Profiles(error) => error.into(),
            Self::Plugins(error) => error.into(),
            Self::Logging(error) => error,
            other => ImperativeError::new(other.to_string()).with_cause(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use std::error::Error;

    use imperative_profiles::ProfilesError;

    use super::CliError;

    #[test]
    fn profiles_error_has_source_chain_and_details() {
        let cli_err: CliError = ProfilesError::NotFound {
            profile_type: "banana".to_string(),
            loaded_types: vec!["strawberry".to_string()],
        }
        .into();

        assert_eq!(
            cli_err.source().map(ToString::to_string),
            Some("no profile of type 'banana' was found".to_string())
        );
        assert_eq!(
            cli_err.additional_details().as_deref(),
            Some("Profile types loaded for this command: strawberry")
        );
    }

    #[test]
    fn validation_failure_counts_plugins() {
        let err = CliError::PluginValidation { failed: 2 };

        assert_eq!(err.to_string(), "2 plugin(s) failed validation");
        assert_eq!(err.into_imperative().message(), "2 plugin(s) failed validation");
    }
}
