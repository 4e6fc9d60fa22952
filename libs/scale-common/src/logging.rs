//! Logging setup for the decoder tooling
//!
//! Console output goes to stderr so command results on stdout stay parseable.
//! An optional log file is written through a non-blocking rolling appender.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level or filter directive (`debug`, `scale_codec=trace,warn`, ...)
    pub level: String,
    pub console: bool,
    pub file: Option<PathBuf>,
    pub rotation: Rotation,
    pub format: LogFormat,
    /// ANSI colors on the console; files never get them
    pub ansi: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            file: None,
            rotation: Rotation::Daily,
            format: LogFormat::Compact,
            ansi: true,
        }
    }
}

impl LogConfig {
    fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.level)
            .map_err(|e| Error::config(format!("Invalid log level '{}': {}", self.level, e)))
    }

    fn appender(&self, path: &Path) -> Result<RollingFileAppender> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let name = path
            .file_name()
            .ok_or_else(|| Error::config(format!("Log file path has no name: {}", path.display())))?;
        std::fs::create_dir_all(dir)?;

        Ok(match self.rotation {
            Rotation::Hourly => rolling::hourly(dir, name),
            Rotation::Daily => rolling::daily(dir, name),
            Rotation::Never => rolling::never(dir, name),
        })
    }
}

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

fn layer<S, W>(format: LogFormat, ansi: bool, writer: W) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer().with_writer(writer).with_target(true);
    match format {
        LogFormat::Json => base.json().with_ansi(false).boxed(),
        LogFormat::Pretty => base.pretty().with_ansi(ansi).boxed(),
        LogFormat::Compact => base.compact().with_ansi(ansi).boxed(),
    }
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop; hold it until exit.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let mut layers = Vec::new();
    let mut guard = None;

    if config.console {
        let console = layer(config.format, config.ansi, std::io::stderr);
        layers.push(console.with_filter(config.filter()?).boxed());
    }

    if let Some(path) = &config.file {
        let (writer, file_guard) = tracing_appender::non_blocking(config.appender(path)?);
        guard = Some(file_guard);
        let file = layer(config.format, false, writer);
        layers.push(file.with_filter(config.filter()?).boxed());
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| Error::config(format!("Logging already initialized: {}", e)))?;

    Ok(guard)
}

#[derive(Default)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_builder_level() {
        let config = LogConfigBuilder::new().level("scale_codec=trace,warn").build();

        assert_eq!(config.level, "scale_codec=trace,warn");
        assert!(config.console);
        assert!(config.file.is_none());
        assert!(config.filter().is_ok());
    }

    #[test]
    fn test_file_and_format_from_document() {
        let config: LogConfig = serde_json::from_str(
            r#"{"file": "logs/framectl.log", "rotation": "never", "format": "json"}"#,
        )
        .unwrap();
        assert_eq!(config.file, Some(PathBuf::from("logs/framectl.log")));
        assert_eq!(config.rotation, Rotation::Never);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: LogConfig =
            serde_json::from_str(r#"{"level": "warn", "rotation": "hourly"}"#).unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.rotation, Rotation::Hourly);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_appender_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/framectl.log");
        let config = LogConfig::default();
        assert!(config.appender(&path).is_ok());
        assert!(dir.path().join("nested").is_dir());
    }
}
