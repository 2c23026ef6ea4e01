//! Default and environment-derived overrides
//!
//! Every override writes `NAMESPACE_PREFIX + bare_key`. Keys read from the
//! input file are never prefixed, so a file key and an override for the same
//! bare key coexist as two entries.

use crate::env::EnvSource;
use crate::properties::{loggable_value, PropertiesMap};
use tracing::debug;
use types::ConfigError;

/// Namespace prepended to every key written by an override
pub const NAMESPACE_PREFIX: &str = "gravitino.iceberg-rest.";

/// Defaults applied on every run, in order, as `(bare key, value)`
pub const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    ("catalog-backend", "jdbc"),
    ("jdbc-driver", "org.sqlite.JDBC"),
    ("uri", "jdbc:sqlite::memory:"),
    ("jdbc-user", "iceberg"),
    ("jdbc-password", "iceberg"),
    ("jdbc-initialize", "true"),
    ("jdbc.schema-version", "V1"),
];

/// Environment variables consulted after the defaults, in order, as
/// `(variable name, bare key)`
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GRAVITINO_IO_IMPL", "io-impl"),
    ("GRAVITINO_URI", "uri"),
    ("GRAVITINO_WAREHOUSE", "warehouse"),
    ("GRAVITINO_CREDENTIAL_PROVIDER_TYPE", "credential-provider-type"),
    ("GRAVITINO_GCS_CREDENTIAL_FILE_PATH", "gcs-credential-file-path"),
];

/// Outcome of the environment override step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrideOutcome {
    /// Variables that were set, in table order
    pub applied: Vec<String>,
    /// Variables that were not set, in table order
    pub missing: Vec<String>,
}

pub fn prefixed_key(bare_key: &str) -> String {
    format!("{}{}", NAMESPACE_PREFIX, bare_key)
}

/// Set the prefixed form of `bare_key`, returning the value it replaced
pub fn apply_override(config: &mut PropertiesMap, bare_key: &str, value: &str) -> Option<String> {
    let key = prefixed_key(bare_key);
    debug!(key = %key, value = loggable_value(&key, value), "Applying override");
    config.insert(key, value)
}

/// Apply `DEFAULT_OVERRIDES` in order
pub fn apply_defaults(config: &mut PropertiesMap) -> Vec<String> {
    DEFAULT_OVERRIDES
        .iter()
        .map(|(bare_key, value)| {
            apply_override(config, bare_key, value);
            bare_key.to_string()
        })
        .collect()
}

/// Apply `ENV_OVERRIDES` in order for every variable present in `env`
pub fn apply_env_overrides<E: EnvSource>(
    config: &mut PropertiesMap,
    env: &E,
) -> Result<EnvOverrideOutcome, ConfigError> {
    let mut outcome = EnvOverrideOutcome::default();

    for (name, bare_key) in ENV_OVERRIDES {
        match env.var(name)? {
            Some(value) => {
                apply_override(config, bare_key, &value);
                outcome.applied.push(name.to_string());
            }
            None => {
                debug!(variable = name, "Environment variable not set, skipping");
                outcome.missing.push(name.to_string());
            }
        }
    }

    Ok(outcome)
}
