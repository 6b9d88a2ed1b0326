//! Flat `key=value` settings file.
//!
//! The file holds one pair per line and no escaping: a line is split at its
//! first `=`, so keys cannot contain `=` and values cannot contain newlines.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

/// File name of the settings file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".acw";

/// Environment variable to override the settings file location.
pub const CONFIG_PATH_ENV_VAR: &str = "ACW_CONFIG";

/// Ordered string-to-string mapping with unique keys.
///
/// Setting an existing key replaces its value in place, so the order in
/// which keys were first inserted survives a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: Vec<(String, String)>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the file format. Blank lines are skipped; values are taken
    /// verbatim after the first `=`.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut map = ConfigMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::MalformedLine {
                line_number: idx + 1,
                line: line.to_string(),
            })?;
            map.set(key, value);
        }

        Ok(map)
    }

    /// Render the file format: one `key=value` per line.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ConfigMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

/// Location of the settings file on disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$ACW_CONFIG` if set, otherwise `<home>/.acw`.
    pub fn default_location() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR)
            && !path.is_empty()
        {
            return Ok(Self::new(path));
        }

        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(Self::new(home.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings. A missing or empty file means "not configured yet".
    pub fn load(&self) -> Result<Option<ConfigMap>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(ConfigError::ReadFailed {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            debug!("Config file {} is empty", self.path.display());
            return Ok(None);
        }

        ConfigMap::parse(&content).map(Some)
    }

    /// Overwrite the file with the given mapping.
    pub fn save(&self, map: &ConfigMap) -> Result<(), ConfigError> {
        fs::write(&self.path, map.render()).map_err(|source| ConfigError::WriteFailed {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} keys to {}", map.len(), self.path.display());
        Ok(())
    }
}
