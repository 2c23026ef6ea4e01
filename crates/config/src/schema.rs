//! Runtime settings of the rewriter itself

use crate::writer::WriteMode;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use types::ConfigError;

/// Prefix of the environment variables that tune the rewriter
pub const SETTINGS_ENV_PREFIX: &str = "GRAVITINO_REWRITER_";

/// Server configuration file rewritten when no path is configured
pub const DEFAULT_CONFIG_PATH: &str = "conf/gravitino-iceberg-rest-server.conf";

/// Settings for one rewrite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriterSettings {
    /// File to rewrite, relative to the working directory
    #[serde(
        default = "default_config_path",
        deserialize_with = "deserialize_path"
    )]
    pub config_path: PathBuf,
    /// How the file is replaced
    #[serde(default)]
    pub write_mode: WriteMode,
    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format: pretty or json
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for RewriterSettings {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            write_mode: WriteMode::default(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl RewriterSettings {
    /// Defaults overlaid with `GRAVITINO_REWRITER_*` variables
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(RewriterSettings::default()))
            .merge(Env::prefixed(SETTINGS_ENV_PREFIX))
    }

    /// Extract settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let settings: RewriterSettings = figment
            .extract()
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.config_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidSettings(
                "config_path cannot be empty".to_string(),
            ));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&self.log_format.as_str()) {
            return Err(ConfigError::InvalidSettings(format!(
                "Invalid log format: {}. Valid formats: {:?}",
                self.log_format, valid_log_formats
            )));
        }

        Ok(())
    }
}

/// Figment's `Env` types values it can parse, so `2024` or `true` arrive as
/// scalars. Any scalar is taken back as path text; floats are re-rendered, so
/// `1.50` becomes `1.5`.
fn deserialize_path<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PathBuf, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PathText {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
        Char(char),
    }

    let text = match PathText::deserialize(deserializer)? {
        PathText::Text(text) => text,
        PathText::Unsigned(n) => n.to_string(),
        PathText::Signed(n) => n.to_string(),
        PathText::Float(n) => n.to_string(),
        PathText::Bool(b) => b.to_string(),
        PathText::Char(c) => c.to_string(),
    };
    Ok(PathBuf::from(text))
}

fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_environment() {
        Jail::expect_with(|_jail| {
            let settings = RewriterSettings::from_env().unwrap();
            assert_eq!(settings, RewriterSettings::default());
            assert_eq!(
                settings.config_path,
                PathBuf::from("conf/gravitino-iceberg-rest-server.conf")
            );
            assert_eq!(settings.write_mode, WriteMode::Atomic);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_settings() {
        Jail::expect_with(|jail| {
            jail.set_env("GRAVITINO_REWRITER_CONFIG_PATH", "/opt/gravitino/conf/server.conf");
            jail.set_env("GRAVITINO_REWRITER_WRITE_MODE", "delete-then-write");
            jail.set_env("GRAVITINO_REWRITER_LOG_FORMAT", "json");
            jail.set_env("GRAVITINO_REWRITER_LOG_LEVEL", "debug");

            let settings = RewriterSettings::from_env().unwrap();
            assert_eq!(
                settings.config_path,
                PathBuf::from("/opt/gravitino/conf/server.conf")
            );
            assert_eq!(settings.write_mode, WriteMode::DeleteThenWrite);
            assert_eq!(settings.log_format, "json");
            assert_eq!(settings.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_numeric_config_path() {
        Jail::expect_with(|jail| {
            jail.set_env("GRAVITINO_REWRITER_CONFIG_PATH", "2024");
            let settings = RewriterSettings::from_env().unwrap();
            assert_eq!(settings.config_path, PathBuf::from("2024"));
            Ok(())
        });

        Jail::expect_with(|jail| {
            jail.set_env("GRAVITINO_REWRITER_CONFIG_PATH", "true");
            let settings = RewriterSettings::from_env().unwrap();
            assert_eq!(settings.config_path, PathBuf::from("true"));
            Ok(())
        });
    }

    #[test]
    fn test_server_variables_are_not_settings() {
        Jail::expect_with(|jail| {
            jail.set_env("GRAVITINO_URI", "jdbc:sqlite:/tmp/x.db");
            let settings = RewriterSettings::from_env().unwrap();
            assert_eq!(settings, RewriterSettings::default());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("GRAVITINO_REWRITER_WRITE_MODE", "sideways");
            let err = RewriterSettings::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSettings(_)));
            Ok(())
        });

        Jail::expect_with(|jail| {
            jail.set_env("GRAVITINO_REWRITER_LOG_FORMAT", "xml");
            let err = RewriterSettings::from_env().unwrap_err();
            assert!(err.to_string().contains("Invalid log format: xml"));
            Ok(())
        });
    }
}
