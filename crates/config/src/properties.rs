//! Flat `key = value` properties files

use indexmap::map::{IndexMap, Iter};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, warn};
use types::ConfigError;

/// Comment marker, only recognised as the first non-whitespace character
pub const COMMENT_MARKER: char = '#';

/// Key/value delimiter, split on its first occurrence
pub const DELIMITER: char = '=';

/// Ordered mapping of configuration keys to values.
///
/// Setting an existing key replaces its value in place, so the key keeps the
/// position of its first insertion. New keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesMap {
    entries: IndexMap<String, String>,
}

impl PropertiesMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the properties file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path_str.clone(),
            },
            _ => ConfigError::Read {
                path: path_str.clone(),
                message: e.to_string(),
            },
        })?;

        let map = Self::parse_named(&content, &path_str)?;
        debug!(path = %path_str, entries = map.len(), "Parsed properties file");
        Ok(map)
    }

    /// Parse properties text held in memory
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse_named(content, "<string>")
    }

    fn parse_named(content: &str, source: &str) -> Result<Self, ConfigError> {
        let mut map = Self::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }

            let (key, value) = line
                .split_once(DELIMITER)
                .ok_or_else(|| ConfigError::MalformedLine {
                    path: source.to_string(),
                    line_number: index + 1,
                    line: line.to_string(),
                })?;

            let key = key.trim();
            if key.is_empty() {
                warn!(source, line_number = index + 1, "Accepted entry with an empty key");
            }
            map.insert(key, value.trim());
        }

        Ok(map)
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Keys in iteration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Render every entry as a `key = value` line, in iteration order
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{} = {}", key, value);
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertiesMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Whether a value for `key` should be kept out of log output
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ["password", "secret", "token"]
        .iter()
        .any(|marker| key.contains(marker))
}

/// Value suitable for logging under `key`
pub fn loggable_value<'a>(key: &str, value: &'a str) -> &'a str {
    if is_secret_key(key) {
        "***"
    } else {
        value
    }
}
