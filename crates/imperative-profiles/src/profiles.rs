use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ProfilesError;

/// A named profile record. Every field other than `name` and `type` is kept
/// in `properties`, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(rename = "type")]
    pub profile_type: String,
    #[serde(flatten)]
    pub properties: IndexMap<String, Value>,
}

impl Profile {
    pub fn new(name: impl Into<String>, profile_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile_type: profile_type.into(),
            properties: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// The profiles loaded for a command, keyed by profile type.
///
/// Types and the profiles filed under each type keep their insertion order,
/// so "the first profile of a type" is well defined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandProfiles {
    profiles: IndexMap<String, Vec<Profile>>,
}

impl CommandProfiles {
    /// # Errors
    ///
    /// Returns [`ProfilesError::TypeMismatch`] when a profile is filed under a
    /// type other than the one it declares.
    pub fn new(profiles: IndexMap<String, Vec<Profile>>) -> Result<Self, ProfilesError> {
        for (profile_type, records) in &profiles {
            if let Some(profile) = records.iter().find(|p| &p.profile_type != profile_type) {
                return Err(ProfilesError::TypeMismatch {
                    name: profile.name.clone(),
                    expected: profile_type.clone(),
                    actual: profile.profile_type.clone(),
                });
            }
        }

        debug!(types = profiles.len(), "loaded command profiles");
        Ok(Self { profiles })
    }

    /// Build from a JSON document shaped `{ "<type>": [ <profile>, ... ] }`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfilesError::Missing`] for `null`, [`ProfilesError::NotAMap`]
    /// when the document is not an object of arrays, and
    /// [`ProfilesError::InvalidProfile`] when a record lacks `name` or `type`.
    /// Type mismatches are reported as by [`CommandProfiles::new`].
    pub fn from_json(document: &Value) -> Result<Self, ProfilesError> {
        let object = match document {
            Value::Null => return Err(ProfilesError::Missing),
            Value::Object(object) => object,
            _ => return Err(ProfilesError::NotAMap),
        };

        let mut profiles = IndexMap::with_capacity(object.len());
        for (profile_type, records) in object {
            let Value::Array(records) = records else {
                return Err(ProfilesError::NotAMap);
            };
            let records = records
                .iter()
                .enumerate()
                .map(|(index, record)| {
                    Profile::deserialize(record).map_err(|source| ProfilesError::InvalidProfile {
                        profile_type: profile_type.clone(),
                        index,
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            profiles.insert(profile_type.clone(), records);
        }

        Self::new(profiles)
    }

    /// Read profiles from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or for any reason listed
    /// on [`CommandProfiles::from_json`].
    pub fn load(path: &Path) -> Result<Self, ProfilesError> {
        let content = fs::read_to_string(path).map_err(|source| ProfilesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&content).map_err(|source| ProfilesError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&document)
    }

    /// Every profile of `profile_type`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`ProfilesError::NotFound`] when no profiles of that type were loaded.
    pub fn get_all(&self, profile_type: &str) -> Result<&[Profile], ProfilesError> {
        self.profiles
            .get(profile_type)
            .map(Vec::as_slice)
            .ok_or_else(|| self.not_found(profile_type, None))
    }

    /// The first profile of `profile_type`, or the one called `name`.
    ///
    /// A miss is an error when `throw_if_not_found` is set and `Ok(None)`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ProfilesError::NotFound`] or [`ProfilesError::NameNotFound`]
    /// on a miss when `throw_if_not_found` is set.
    pub fn get(
        &self,
        profile_type: &str,
        throw_if_not_found: bool,
        name: Option<&str>,
    ) -> Result<Option<&Profile>, ProfilesError> {
        let records = self.profiles.get(profile_type);
        let found = match name {
            Some(name) => records.and_then(|records| records.iter().find(|p| p.name == name)),
            None => records.and_then(|records| records.first()),
        };

        match found {
            Some(profile) => Ok(Some(profile)),
            None if throw_if_not_found => Err(self.not_found(profile_type, name)),
            None => {
                debug!(profile_type, ?name, "optional profile not loaded");
                Ok(None)
            }
        }
    }

    /// Loaded profile types, in insertion order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn not_found(&self, profile_type: &str, name: Option<&str>) -> ProfilesError {
        let loaded_types = self.profiles.keys().cloned().collect();
        match name {
            Some(name) => ProfilesError::NameNotFound {
                profile_type: profile_type.to_string(),
                name: name.to_string(),
                loaded_types,
            },
            None => ProfilesError::NotFound {
                profile_type: profile_type.to_string(),
                loaded_types,
            },
        }
    }
}
