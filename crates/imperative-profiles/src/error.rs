use std::path::PathBuf;

use imperative_core::ImperativeError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfilesError {
    #[error("expected a profile map, but none was supplied")]
    Missing,

    #[error("the supplied profiles are not a map of profile type to a list of profiles")]
    NotAMap,

    #[error("profile {index} of type '{profile_type}' is not a valid profile")]
    InvalidProfile {
        profile_type: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("profile '{name}' is filed under type '{expected}' but declares type '{actual}'")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("no profile of type '{profile_type}' was found")]
    NotFound {
        profile_type: String,
        loaded_types: Vec<String>,
    },

    #[error("no profile of type '{profile_type}' named '{name}' was found")]
    NameNotFound {
        profile_type: String,
        name: String,
        loaded_types: Vec<String>,
    },

    #[error("failed to read profiles from '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profiles at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ProfilesError {
    /// Extra context for a user, if the error has any.
    #[must_use]
    pub fn additional_details(&self) -> Option<String> {
        match self {
            Self::NotFound { loaded_types, .. } | Self::NameNotFound { loaded_types, .. } => {
                Some(if loaded_types.is_empty() {
                    "No profiles were loaded for this command.".to_string()
                } else {
                    format!(
                        "Profile types loaded for this command: {}",
                        loaded_types.join(", ")
                    )
                })
            }
            _ => None,
        }
    }
}

impl From<ProfilesError> for ImperativeError {
    fn from(error: ProfilesError) -> Self {
        let imperative = ImperativeError::new(error.to_string());
        let imperative = match error.additional_details() {
            Some(details) => imperative.with_details(details),
            None => imperative,
        };
        imperative.with_cause(error)
    }
}
