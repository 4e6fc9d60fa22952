//! Decode error types
//!
//! `DecodeError` is internal to the decode pipeline and never crosses the
//! public `decode` boundary. The orchestrator reports it as one of the three
//! stable `ErrorCode` identifiers, chosen by the pipeline step that failed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for decode pipeline steps
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Stable error identifiers consumed by downstream services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Wrong length, header/trailer mismatch, invalid charset, missing field config
    InvalidDataFormat,
    /// A field could not be converted, or no weight was decoded
    ParseFailed,
    /// Structurally valid frame whose checksum does not match
    ChecksumFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidDataFormat => "INVALID_DATA_FORMAT",
            ErrorCode::ParseFailed => "PARSE_FAILED",
            ErrorCode::ChecksumFailed => "CHECKSUM_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised inside the decode pipeline
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// Structural validation failed
    #[error("Invalid frame: {0}")]
    InvalidFormat(String),

    /// A field value could not be turned into a number
    #[error("Invalid number for {field}: '{text}'")]
    InvalidNumber { field: String, text: String },

    /// Field width does not fit the configured data type
    #[error("Unsupported {data_type} width for {field}: {width} bytes")]
    UnsupportedWidth {
        field: String,
        data_type: String,
        width: usize,
    },

    /// Checksum range or position lies outside the frame
    #[error("Checksum configuration error: {0}")]
    ChecksumConfig(String),

    /// Any other decode failure
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DecodeError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        DecodeError::InvalidFormat(msg.into())
    }

    pub fn invalid_number(field: impl Into<String>, text: impl Into<String>) -> Self {
        DecodeError::InvalidNumber {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        DecodeError::Parse(msg.into())
    }
}
