//! Configuration rewriter
//!
//! Loads the server configuration file, overlays the default and
//! environment-derived overrides, and writes the merged mapping back in place.

use crate::env::EnvSource;
use crate::overrides::{apply_defaults, apply_env_overrides};
use crate::properties::PropertiesMap;
use crate::schema::RewriterSettings;
use crate::writer::{write_properties, WriteMode};
use std::path::{Path, PathBuf};
use tracing::info;
use types::Result;

/// Summary of one rewrite run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteReport {
    pub path: PathBuf,
    /// Entries parsed from the existing file
    pub loaded_entries: usize,
    /// Bare keys of the defaults, in application order
    pub defaults_applied: Vec<String>,
    /// Environment variables that produced an override
    pub env_applied: Vec<String>,
    /// Environment variables that were not set
    pub env_missing: Vec<String>,
    /// Entries in the rewritten file
    pub total_entries: usize,
}

impl RewriteReport {
    pub fn summary(&self) -> String {
        format!(
            "Rewrote {}: {} loaded, {} defaults, {} from environment, {} total",
            self.path.display(),
            self.loaded_entries,
            self.defaults_applied.len(),
            self.env_applied.len(),
            self.total_entries
        )
    }
}

/// Rewrites one configuration file
#[derive(Debug, Clone)]
pub struct ConfigRewriter {
    path: PathBuf,
    write_mode: WriteMode,
}

impl ConfigRewriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_mode: WriteMode::default(),
        }
    }

    pub fn from_settings(settings: &RewriterSettings) -> Self {
        Self::new(settings.config_path.clone()).with_write_mode(settings.write_mode)
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Load the file and apply every override without writing anything
    pub fn merge<E: EnvSource>(&self, env: &E) -> Result<(PropertiesMap, RewriteReport)> {
        let mut config = PropertiesMap::load(&self.path)?;
        let loaded_entries = config.len();
        info!(path = %self.path.display(), entries = loaded_entries, "Loaded configuration file");

        let defaults_applied = apply_defaults(&mut config);
        info!(count = defaults_applied.len(), "Applied default overrides");

        let outcome = apply_env_overrides(&mut config, env)?;
        info!(
            applied = ?outcome.applied,
            missing = outcome.missing.len(),
            "Applied environment overrides"
        );

        let report = RewriteReport {
            path: self.path.clone(),
            loaded_entries,
            defaults_applied,
            env_applied: outcome.applied,
            env_missing: outcome.missing,
            total_entries: config.len(),
        };
        Ok((config, report))
    }

    /// Load, apply overrides and replace the file
    pub fn run<E: EnvSource>(&self, env: &E) -> Result<RewriteReport> {
        let (config, report) = self.merge(env)?;
        write_properties(&self.path, &config, self.write_mode)?;
        info!(
            path = %self.path.display(),
            entries = report.total_entries,
            mode = %self.write_mode,
            "Configuration file rewritten"
        );
        Ok(report)
    }
}
