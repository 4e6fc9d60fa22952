//! Errors raised while loading profiles, settings and operator input

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Extension is missing or not one of yaml/yml/json/toml
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Document exists but does not match the expected structure
    #[error("Failed to load {}: {message}", path.display())]
    Document { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Malformed operator input (hex text and similar)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn document(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Document {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = Error::NotFound(PathBuf::from("profiles/ws300.yaml"));
        assert_eq!(err.to_string(), "File not found: profiles/ws300.yaml");

        let err = Error::document("ws300.yaml", "missing field `frame_type`");
        assert_eq!(
            err.to_string(),
            "Failed to load ws300.yaml: missing field `frame_type`"
        );
    }

    #[test]
    fn test_serializer_errors_convert() {
        let err: Error = serde_json::from_str::<String>("{").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
