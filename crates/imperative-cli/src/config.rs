use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use imperative_core::LoggingConfig;
use serde::Deserialize;

use crate::error::{CliError, Result};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "imperative.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub(crate) logging: LoggingConfig,
    pub(crate) plugins: PluginsConfig,
    pub(crate) profiles: ProfilesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PluginsConfig {
    pub(crate) file: PathBuf,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("plugins").join("plugins.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProfilesConfig {
    pub(crate) file: PathBuf,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("profiles.json"),
        }
    }
}

impl CliConfig {
    /// Load `explicit`, or `imperative.toml` in the working directory.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error. Relative paths in the file are resolved against the directory
    /// that contains it.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) if source.kind() == ErrorKind::NotFound && explicit.is_none() => {
                return Ok(Self::default());
            }
            Err(source) => return Err(CliError::ConfigRead { path, source }),
        };

        let mut config: Self =
            toml::from_str(&content).map_err(|source| CliError::ConfigParse {
                path: path.clone(),
                source,
            })?;

        if let Some(base) = path.parent().filter(|base| !base.as_os_str().is_empty()) {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.plugins.file);
        resolve(&mut self.profiles.file);
        if let Some(file) = self.logging.file.as_mut() {
            resolve(file);
        }
    }
}
