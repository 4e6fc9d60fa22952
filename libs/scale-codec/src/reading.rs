//! Decoded reading types
//!
//! `ParsedFrameData` is the per-call accumulator the format decoders write
//! into. `finish()` turns it into an immutable `Reading`, and `ParseResult` is
//! what callers receive from `decode`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FieldRole;
use crate::error::{DecodeError, ErrorCode, Result};

/// Unit label used when no unit field resolved
pub const DEFAULT_UNIT: &str = "kg";

// ============================================================================
// Accumulator
// ============================================================================

/// Mutable accumulator filled field by field during one decode call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFrameData {
    pub weight: Option<f64>,
    pub unit: Option<String>,
    pub stable: bool,
    pub tare: Option<f64>,
    pub gross: Option<f64>,
    pub net: Option<f64>,
    /// Set by a `sign` field; applied once in `finish`
    pub negative: bool,
}

impl ParsedFrameData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a numeric value under its role; non-numeric roles are ignored
    pub fn set_measure(&mut self, role: &FieldRole, value: f64) {
        match role {
            FieldRole::Weight => self.weight = Some(value),
            FieldRole::Tare => self.tare = Some(value),
            FieldRole::Gross => self.gross = Some(value),
            FieldRole::Net => self.net = Some(value),
            FieldRole::Sign | FieldRole::Unit | FieldRole::Stable | FieldRole::Unknown(_) => {},
        }
    }

    /// Finalize into a reading, negating the weight iff the sign was negative
    pub fn finish(self) -> Result<Reading> {
        let weight = self
            .weight
            .ok_or_else(|| DecodeError::parse("no weight decoded"))?;
        let weight = if self.negative { -weight } else { weight };

        Ok(Reading {
            weight,
            unit: self.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            stable: self.stable,
            tare: self.tare,
            gross: self.gross,
            net: self.net,
        })
    }
}

/// Finalized values of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub weight: f64,
    pub unit: String,
    pub stable: bool,
    pub tare: Option<f64>,
    pub gross: Option<f64>,
    pub net: Option<f64>,
}

// ============================================================================
// Public Result
// ============================================================================

/// Outcome of decoding one frame
///
/// `success` is true iff a weight was decoded and the checksum (if any) passed.
/// A checksum failure still carries every decoded value for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tare_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gross_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    net_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checksum_valid: Option<bool>,
    frame_length: usize,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl ParseResult {
    fn with_reading(reading: Reading, frame_length: usize) -> Self {
        Self {
            success: true,
            weight: Some(reading.weight),
            unit: Some(reading.unit),
            stable: Some(reading.stable),
            tare_weight: reading.tare,
            gross_weight: reading.gross,
            net_weight: reading.net,
            checksum_valid: Some(true),
            frame_length,
            timestamp: Utc::now(),
            error_code: None,
            error_message: None,
        }
    }

    /// Successful decode with a verified (or unconfigured) checksum
    pub fn success(reading: Reading, frame_length: usize) -> Self {
        Self::with_reading(reading, frame_length)
    }

    /// Decoded frame whose checksum did not match
    pub fn checksum_failure(reading: Reading, frame_length: usize) -> Self {
        Self {
            success: false,
            checksum_valid: Some(false),
            error_code: Some(ErrorCode::ChecksumFailed),
            error_message: Some("checksum verification failed".to_string()),
            ..Self::with_reading(reading, frame_length)
        }
    }

    /// Failure without decoded values
    pub fn failure(code: ErrorCode, message: impl Into<String>, frame_length: usize) -> Self {
        Self {
            success: false,
            weight: None,
            unit: None,
            stable: None,
            tare_weight: None,
            gross_weight: None,
            net_weight: None,
            checksum_valid: None,
            frame_length,
            timestamp: Utc::now(),
            error_code: Some(code),
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn is_stable(&self) -> Option<bool> {
        self.stable
    }

    pub fn tare_weight(&self) -> Option<f64> {
        self.tare_weight
    }

    pub fn gross_weight(&self) -> Option<f64> {
        self.gross_weight
    }

    pub fn net_weight(&self) -> Option<f64> {
        self.net_weight
    }

    pub fn checksum_valid(&self) -> Option<bool> {
        self.checksum_valid
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// JSON document for downstream services
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
