//! Replacing the configuration file on disk

use crate::properties::PropertiesMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use types::ConfigError;

/// How the rendered mapping replaces the target file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Write a sibling temporary file, sync it, then rename it over the target
    #[default]
    Atomic,
    /// Remove the target, then create and write it in place
    DeleteThenWrite,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteMode::Atomic => write!(f, "atomic"),
            WriteMode::DeleteThenWrite => write!(f, "delete-then-write"),
        }
    }
}

/// Replace the file at `path` with one `key = value` line per entry
pub fn write_properties<P: AsRef<Path>>(
    path: P,
    config: &PropertiesMap,
    mode: WriteMode,
) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let content = config.render();

    match mode {
        WriteMode::Atomic => write_atomic(path, content.as_bytes()),
        WriteMode::DeleteThenWrite => write_in_place(path, content.as_bytes()),
    }?;

    debug!(path = %path.display(), entries = config.len(), mode = %mode, "Wrote configuration file");
    Ok(())
}

fn write_error(path: &Path, action: &str, err: std::io::Error) -> ConfigError {
    ConfigError::Write {
        path: path.display().to_string(),
        message: format!("{}: {}", action, err),
    }
}

fn write_in_place(path: &Path, content: &[u8]) -> Result<(), ConfigError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| write_error(path, "remove existing file", e))?;
    }

    let mut file = fs::File::create(path).map_err(|e| write_error(path, "create file", e))?;
    file.write_all(content)
        .map_err(|e| write_error(path, "write contents", e))?;
    file.flush().map_err(|e| write_error(path, "flush", e))?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ConfigError> {
    if path.is_dir() {
        return Err(ConfigError::Write {
            path: path.display().to_string(),
            message: "target is a directory".to_string(),
        });
    }

    let temp_path = temp_path_for(path);
    let result = fs::File::create(&temp_path)
        .map_err(|e| write_error(&temp_path, "create temporary file", e))
        .and_then(|mut file| {
            file.write_all(content)
                .map_err(|e| write_error(&temp_path, "write contents", e))?;
            file.sync_all()
                .map_err(|e| write_error(&temp_path, "sync temporary file", e))
        })
        .and_then(|_| {
            fs::rename(&temp_path, path).map_err(|e| write_error(path, "rename temporary file", e))
        });

    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary file");
        }
    }

    result
}
