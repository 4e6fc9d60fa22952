//! Delimiter separated ASCII frames
//!
//! Fields keep a fixed order but have variable width, e.g. `W,123.45,kg,S`.
//! The delimiter is matched literally, so characters such as `|` or `.` need
//! no escaping in profiles.

use tracing::{debug, warn};

use super::text::{decode_measure, normalize_unit, resolve_stable};
use crate::config::{ChecksumAlgorithm, FieldRole, FrameFormatConfig, FrameType};
use crate::decoder::FrameDecoder;
use crate::error::{DecodeError, Result};
use crate::reading::ParsedFrameData;

/// Delimiter used when the profile does not configure one
pub const DEFAULT_DELIMITER: &str = ",";

/// Decoder for `ASCII_VARIABLE` frames
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiVariableDecoder;

fn delimiter(format: &FrameFormatConfig) -> Result<&str> {
    let delimiter = format.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER);
    if delimiter.is_empty() {
        return Err(DecodeError::invalid_format("delimiter must not be empty"));
    }
    Ok(delimiter)
}

fn as_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| DecodeError::invalid_format(format!("frame is not valid text: {}", e)))
}

fn trim_frame(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c.is_control())
}

/// Strip the optional prefix and suffix, then surrounding whitespace and control characters
fn payload_text<'a>(format: &FrameFormatConfig, text: &'a str) -> &'a str {
    let mut text = trim_frame(text);
    if let Some(prefix) = format.prefix.as_deref().filter(|p| !p.is_empty()) {
        text = text.strip_prefix(prefix).unwrap_or(text);
    }
    if let Some(suffix) = format.suffix.as_deref().filter(|s| !s.is_empty()) {
        text = text.strip_suffix(suffix).unwrap_or(text);
    }
    trim_frame(text)
}

/// Literal split with trailing empty tokens dropped
fn split_tokens<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    let mut tokens: Vec<&str> = text.split(delimiter).collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

impl FrameDecoder for AsciiVariableDecoder {
    fn frame_type(&self) -> FrameType {
        FrameType::AsciiVariable
    }

    fn validate_frame(&self, format: &FrameFormatConfig, frame: &[u8]) -> Result<()> {
        format.check_length(frame.len())?;

        let text = as_text(frame)?;
        let delimiter = delimiter(format)?;
        if !text.contains(delimiter) {
            return Err(DecodeError::invalid_format(format!(
                "delimiter '{}' not found in frame",
                delimiter.escape_debug()
            )));
        }

        if let Some(min_tokens) = format.min_tokens {
            let count = split_tokens(payload_text(format, text), delimiter).len();
            if count < min_tokens {
                return Err(DecodeError::invalid_format(format!(
                    "{} tokens, at least {} required",
                    count, min_tokens
                )));
            }
        }

        format.require_fields()
    }

    fn extract_segment<'a>(&self, format: &FrameFormatConfig, frame: &'a [u8]) -> Result<&'a [u8]> {
        let text = as_text(frame)?;
        Ok(payload_text(format, text).as_bytes())
    }

    fn decode_fields(
        &self,
        format: &FrameFormatConfig,
        _frame: &[u8],
        segment: &[u8],
        data: &mut ParsedFrameData,
    ) -> Result<()> {
        let tokens = split_tokens(as_text(segment)?, delimiter(format)?);
        debug!(count = tokens.len(), "Split delimited frame");

        for field in &format.fields {
            let Some(token) = tokens.get(field.index).copied() else {
                warn!(
                    field = %field.role,
                    index = field.index,
                    available = tokens.len(),
                    "Token index outside frame, skipped"
                );
                continue;
            };

            match &field.role {
                FieldRole::Sign => data.negative = token.trim_start().starts_with('-'),
                FieldRole::Weight | FieldRole::Tare | FieldRole::Gross | FieldRole::Net => {
                    let negative = token.trim_start().starts_with('-');
                    let value = decode_measure(field, token, false)?;
                    data.set_measure(&field.role, if negative { -value } else { value });
                },
                FieldRole::Unit => {
                    let unit = normalize_unit(token);
                    if !unit.is_empty() {
                        data.unit = Some(unit);
                    }
                },
                FieldRole::Stable => data.stable = resolve_stable(field, token, true),
                FieldRole::Unknown(name) => debug!("Ignoring field with unknown role '{}'", name),
            }
        }
        Ok(())
    }

    fn verify_checksum(&self, format: &FrameFormatConfig, _frame: &[u8]) -> Result<bool> {
        let algorithm = format.checksum_algorithm();
        if algorithm != ChecksumAlgorithm::None {
            warn!(%algorithm, "Delimited frames carry no checksum, verification skipped");
        }
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::config::{ChecksumConfig, FieldDefinition};
    use crate::error::ErrorCode;

    fn weight_unit_stable() -> FrameFormatConfig {
        FrameFormatConfig::new(FrameType::AsciiVariable)
            .with_field(FieldDefinition::new(FieldRole::Weight).token(1))
            .with_field(FieldDefinition::new(FieldRole::Unit).token(2))
            .with_field(FieldDefinition::new(FieldRole::Stable).token(3))
    }

    #[test]
    fn test_decode_delimited_frame() {
        let result = AsciiVariableDecoder.decode(&weight_unit_stable(), b"W,123.45,kg,S");

        assert!(result.is_success(), "{:?}", result.error_message());
        assert_eq!(result.weight(), Some(123.45));
        assert_eq!(result.unit(), Some("kg"));
        assert_eq!(result.is_stable(), Some(true));
    }

    #[test]
    fn test_negative_token_and_unit_spelling() {
        let result = AsciiVariableDecoder.decode(&weight_unit_stable(), b"W, -5.5 ,Pounds,no\r\n");
        assert_eq!(result.weight(), Some(-5.5));
        assert_eq!(result.unit(), Some("lb"));
        assert_eq!(result.is_stable(), Some(false));
    }

    #[test]
    fn test_prefix_suffix_and_custom_delimiter() {
        let format = FrameFormatConfig::new(FrameType::AsciiVariable)
            .with_prefix("<")
            .with_suffix(">")
            .with_delimiter("|")
            .with_min_tokens(3)
            .with_field(FieldDefinition::new(FieldRole::Gross).token(0).with_decimals(1))
            .with_field(FieldDefinition::new(FieldRole::Weight).token(1).with_decimals(1))
            .with_field(FieldDefinition::new(FieldRole::Stable).token(2));

        let result = AsciiVariableDecoder.decode(&format, b"<1005|0995|YES>\r\n");
        assert!(result.is_success(), "{:?}", result.error_message());
        assert_eq!(result.gross_weight(), Some(100.5));
        assert_eq!(result.weight(), Some(99.5));
        assert_eq!(result.is_stable(), Some(true));
    }

    #[test]
    fn test_missing_delimiter_and_token_count() {
        let result = AsciiVariableDecoder.decode(&weight_unit_stable(), b"W 123.45 kg S");
        assert_eq!(result.error_code(), Some(ErrorCode::InvalidDataFormat));

        let format = weight_unit_stable().with_min_tokens(4);
        let result = AsciiVariableDecoder.decode(&format, b"W,123.45,,");
        assert_eq!(result.error_code(), Some(ErrorCode::InvalidDataFormat));
    }

    #[test]
    fn test_missing_weight_token_is_parse_failure() {
        let result = AsciiVariableDecoder.decode(&weight_unit_stable(), b"W,");
        assert_eq!(result.error_code(), Some(ErrorCode::ParseFailed));
    }

    #[test]
    fn test_checksum_other_than_none_is_ignored() {
        let format = weight_unit_stable().with_checksum(ChecksumConfig::new(ChecksumAlgorithm::Xor));
        let result = AsciiVariableDecoder.decode(&format, b"W,1,kg,S");
        assert!(result.is_success());
        assert_eq!(result.checksum_valid(), Some(true));
    }

    #[test]
    fn test_split_drops_trailing_empty_tokens() {
        assert_eq!(split_tokens("a,,b,,", ","), vec!["a", "", "b"]);
        assert_eq!(split_tokens("a||b", "||"), vec!["a", "b"]);
    }
}
