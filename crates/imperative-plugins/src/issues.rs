use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PluginError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginIssue {
    pub severity: IssueSeverity,
    pub text: String,
}

/// An entry of the installed-plugins file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstalledPlugin {
    pub package: String,
    pub registry: String,
    pub version: String,
}

/// Issues recorded against plugins, keyed by plugin name.
///
/// The installed plugins are read from a JSON file shaped
/// `{ "<name>": { "package": ..., "registry": ..., "version": ... } }`.
#[derive(Debug, Default)]
pub struct PluginIssues {
    plugins_file: RwLock<Option<PathBuf>>,
    issues: RwLock<IndexMap<String, Vec<PluginIssue>>>,
}

impl PluginIssues {
    pub fn new(plugins_file: impl Into<PathBuf>) -> Self {
        Self {
            plugins_file: RwLock::new(Some(plugins_file.into())),
            issues: RwLock::new(IndexMap::new()),
        }
    }

    /// The process-wide registry. It knows no installed plugins until
    /// [`set_plugins_file`](Self::set_plugins_file) is called.
    pub fn instance() -> &'static PluginIssues {
        static INSTANCE: OnceLock<PluginIssues> = OnceLock::new();
        INSTANCE.get_or_init(PluginIssues::default)
    }

    pub fn set_plugins_file(&self, plugins_file: impl Into<PathBuf>) {
        *self.plugins_file.write() = Some(plugins_file.into());
    }

    #[must_use]
    pub fn plugins_file(&self) -> Option<PathBuf> {
        self.plugins_file.read().clone()
    }

    pub fn record_issue(&self, plugin: &str, severity: IssueSeverity, text: impl Into<String>) {
        let text = text.into();
        debug!(plugin, %severity, text = text.as_str(), "recording plugin issue");
        self.issues
            .write()
            .entry(plugin.to_string())
            .or_default()
            .push(PluginIssue { severity, text });
    }

    pub fn remove_issues_for_plugin(&self, plugin: &str) {
        self.issues.write().shift_remove(plugin);
    }

    /// Issues recorded for `plugin`, oldest first.
    #[must_use]
    pub fn issues_for_plugin(&self, plugin: &str) -> Vec<PluginIssue> {
        self.issues
            .read()
            .get(plugin)
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn does_plugin_have_error(&self, plugin: &str) -> bool {
        self.issues.read().get(plugin).is_some_and(|issues| {
            issues
                .iter()
                .any(|issue| issue.severity == IssueSeverity::Error)
        })
    }

    /// Read the installed plugins. A missing file means no plugins are installed.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or is not valid JSON of
    /// the expected shape.
    pub fn installed_plugins(&self) -> Result<IndexMap<String, InstalledPlugin>, PluginError> {
        match self.plugins_file() {
            Some(path) => read_installed_plugins(&path),
            None => Ok(IndexMap::new()),
        }
    }
}

fn read_installed_plugins(path: &Path) -> Result<IndexMap<String, InstalledPlugin>, PluginError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no installed plugins file");
            return Ok(IndexMap::new());
        }
        Err(source) => {
            return Err(PluginError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| PluginError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
