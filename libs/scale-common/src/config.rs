//! Configuration loading utilities
//!
//! Device profiles and tool settings are plain serde documents. The format is
//! chosen by file extension (`.yaml`/`.yml`, `.json`, `.toml`).

use crate::{Error, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Build a figment provider chain for a single file, selected by extension
fn file_figment(path: &Path) -> Result<Figment> {
    match extension(path)? {
        "toml" => Ok(Figment::new().merge(Toml::file(path))),
        "yaml" | "yml" => Ok(Figment::new().merge(Yaml::file(path))),
        "json" => Ok(Figment::new().merge(Json::file(path))),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}

fn extension(path: &Path) -> Result<&str> {
    path.extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::UnsupportedFormat(format!("no extension on {}", path.display())))
}

/// Load configuration from a specific file
pub fn load_config_from_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    file_figment(path)?
        .extract()
        .map_err(|e| Error::document(path, e))
}

/// Load layered tool settings
///
/// Priority (highest to lowest):
/// 1. Environment variables prefixed with `{APP}_`; `__` separates nested keys
///    (e.g. `FRAMECTL_LOG__LEVEL=debug`)
/// 2. Explicit settings file, if given
/// 3. `{app}.toml` / `{app}.yaml` in the working directory
/// 4. `T::default()`
pub fn load_layered<T>(app_name: &str, explicit: Option<&Path>) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Serialize + Default,
{
    let mut figment = Figment::from(Serialized::defaults(T::default()))
        .merge(Toml::file(format!("{}.toml", app_name)))
        .merge(Yaml::file(format!("{}.yaml", app_name)));

    if let Some(path) = explicit {
        figment = figment.merge(file_figment(path)?);
    }

    figment
        .merge(Env::prefixed(&format!("{}_", app_name.to_uppercase())).split("__"))
        .extract()
        .map_err(|e| Error::config(format!("Failed to load configuration: {}", e)))
}

/// Save configuration to a file
pub fn save_config_to_file<T, P>(config: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = extension(path)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = match format {
        "toml" => toml::to_string_pretty(config)?,
        "yaml" | "yml" => serde_yaml::to_string(config)?,
        "json" => serde_json::to_string_pretty(config)?,
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    };

    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct TestConfig {
        name: String,
        baud_rate: u32,
        nested: NestedConfig,
    }

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct NestedConfig {
        enabled: bool,
    }

    fn sample() -> TestConfig {
        TestConfig {
            name: "bench-scale".to_string(),
            baud_rate: 9600,
            nested: NestedConfig { enabled: true },
        }
    }

    #[test]
    fn test_save_and_load_all_formats() {
        let dir = TempDir::new().unwrap();
        for ext in ["yaml", "json", "toml"] {
            let path = dir.path().join(format!("profile.{}", ext));
            save_config_to_file(&sample(), &path).unwrap();
            let loaded: TestConfig = load_config_from_file(&path).unwrap();
            assert_eq!(loaded, sample(), "round trip through {}", ext);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.ini");
        std::fs::write(&path, "name=x").unwrap();
        let result: Result<TestConfig> = load_config_from_file(&path);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<TestConfig> = load_config_from_file("/nonexistent/profile.yaml");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_layered_explicit_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "name: line-3\nbaud_rate: 19200\n").unwrap();

        let loaded: TestConfig = load_layered("scaletest", Some(&path)).unwrap();
        assert_eq!(loaded.name, "line-3");
        assert_eq!(loaded.baud_rate, 19200);
        assert!(!loaded.nested.enabled);
    }
}
