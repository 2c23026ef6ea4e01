//! Environment variable sources

use std::collections::HashMap;
use std::ffi::OsString;
use types::ConfigError;

/// Lookup of environment variables by name
pub trait EnvSource {
    /// Value of `name`, or `None` when the variable is not set
    fn var(&self, name: &str) -> Result<Option<String>, ConfigError>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Result<Option<String>, ConfigError> {
        std::env::var_os(name)
            .map(|value| decode_value(name, value))
            .transpose()
    }
}

/// Values are written to disk verbatim, so they must be valid Unicode
fn decode_value(name: &str, value: OsString) -> Result<String, ConfigError> {
    value.into_string().map_err(|_| ConfigError::NonUnicodeEnv {
        name: name.to_string(),
    })
}

/// In-memory environment
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.vars.get(name).cloned())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, name: &str) -> Result<Option<String>, ConfigError> {
        (**self).var(name)
    }
}
