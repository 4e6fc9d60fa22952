//! framectl settings
//!
//! Layered from defaults, `framectl.toml` / `framectl.yaml` in the working
//! directory, an explicit `--settings` file and `FRAMECTL_*` environment
//! variables (`FRAMECTL_LOG__LEVEL=debug`, `FRAMECTL_PROFILE_DIR=/etc/scales`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scale_common::serde_helpers::bool_true;
use scale_common::{LogConfig, LogConfigBuilder};
use serde::{Deserialize, Serialize};

/// Output style for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_log() -> LogConfig {
    LogConfigBuilder::new().level("warn").build()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log")]
    pub log: LogConfig,

    /// Directory searched for relative profile paths
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    #[serde(default)]
    pub output: OutputFormat,

    /// Colored terminal output
    #[serde(default = "bool_true")]
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log: default_log(),
            profile_dir: None,
            output: OutputFormat::Text,
            color: true,
        }
    }
}

impl Settings {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        scale_common::config::load_layered("framectl", explicit)
            .context("Failed to load framectl settings")
    }

    /// Resolve a profile argument: existing paths win, then `profile_dir`
    pub fn resolve_profile(&self, path: &Path) -> PathBuf {
        if path.exists() || path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.profile_dir {
            Some(dir) if dir.join(path).exists() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.log.level, "warn");
        assert_eq!(settings.output, OutputFormat::Text);
        assert!(settings.color);
    }

    #[test]
    fn test_explicit_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "output: json\ncolor: false\nlog:\n  level: debug\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.output, OutputFormat::Json);
        assert!(!settings.color);
        assert_eq!(settings.log.level, "debug");
    }

    #[test]
    fn test_resolve_profile_from_profile_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scale.yaml"), "model: x\n").unwrap();

        let settings = Settings {
            profile_dir: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };
        assert_eq!(
            settings.resolve_profile(Path::new("scale.yaml")),
            dir.path().join("scale.yaml")
        );
        assert_eq!(
            settings.resolve_profile(Path::new("other.yaml")),
            PathBuf::from("other.yaml")
        );
    }
}
