use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cleaner::CleanOptions;
use crate::error::{ConfigError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cleaner: CleanerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Move directories to the trash instead of removing them
    pub send_to_trash: bool,
    /// Never descend into symlinks or mount points
    pub skip_reparse_points: bool,
    /// Allow the scan root itself to be deleted when empty
    pub delete_root_when_empty: bool,
    /// Maximum scan depth (unset = unlimited)
    pub max_depth: Option<usize>,
    /// Glob patterns matched against path segments
    pub exclude_patterns: Vec<String>,
    /// Absolute paths never visited
    pub exclude_paths: Vec<PathBuf>,
    /// Failures listed before the "...and N more" line
    pub max_reported_failures: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            send_to_trash: false,
            skip_reparse_points: true,
            delete_root_when_empty: false,
            max_depth: None,
            exclude_patterns: vec![".git".to_string()],
            exclude_paths: vec![],
            max_reported_failures: 10,
        }
    }
}

impl CleanerConfig {
    /// Options for a clean pass built from these settings.
    pub fn to_options(&self) -> CleanOptions {
        let mut options = CleanOptions::new()
            .with_send_to_trash(self.send_to_trash)
            .with_skip_reparse_points(self.skip_reparse_points)
            .with_delete_root_when_empty(self.delete_root_when_empty)
            .with_excluded_names(self.exclude_patterns.iter().cloned())
            .with_excluded_paths(self.exclude_paths.iter().cloned());
        options.max_depth = self.max_depth;
        options
    }
}

impl Config {
    /// Default location: `<config dir>/empty-sweeper/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("empty-sweeper").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// read when present and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.is_file() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.clone(),
                source,
            })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Reject settings that cannot be used.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.cleaner.max_reported_failures == 0 {
            return Err(ConfigError::Invalid(
                "cleaner.max_reported_failures must be at least 1".to_string(),
            ));
        }
        if let Some(relative) = self.cleaner.exclude_paths.iter().find(|p| p.is_relative()) {
            return Err(ConfigError::Invalid(format!(
                "cleaner.exclude_paths entries must be absolute: {}",
                relative.display()
            )));
        }
        Ok(())
    }
}
