//! Frame decoder contract and the shared decode pipeline
//!
//! Every wire format implements the four format-specific steps of
//! [`FrameDecoder`]; the provided [`FrameDecoder::decode`] method runs them in
//! a fixed order and turns every failure into a structured [`ParseResult`]:
//!
//! 1. empty input / decoder mismatch → `INVALID_DATA_FORMAT`
//! 2. `validate_frame` → `INVALID_DATA_FORMAT`
//! 3. `extract_segment` (empty payload) → `PARSE_FAILED`
//! 4. `decode_fields` (no weight) → `PARSE_FAILED`
//! 5. `verify_checksum` → `CHECKSUM_FAILED`, decoded values attached
//!
//! Errors raised by steps 3 to 5 are reported as `PARSE_FAILED`.

use tracing::{debug, trace};

use scale_common::hex::encode_spaced;

use crate::config::{FrameFormatConfig, FrameType};
use crate::error::{ErrorCode, Result};
use crate::reading::{ParseResult, ParsedFrameData};

/// Format-specific decoding steps
///
/// Implementations are stateless; one shared instance serves every caller.
pub trait FrameDecoder: Send + Sync {
    /// Frame type this decoder implements
    fn frame_type(&self) -> FrameType;

    /// Structural checks: length, literal markers, charset, field configuration
    fn validate_frame(&self, format: &FrameFormatConfig, frame: &[u8]) -> Result<()>;

    /// Isolate the payload used for field decoding
    fn extract_segment<'a>(&self, format: &FrameFormatConfig, frame: &'a [u8]) -> Result<&'a [u8]>;

    /// Decode the configured fields into the accumulator
    ///
    /// Fields whose position lies outside the available bytes are skipped
    /// with a warning.
    fn decode_fields(
        &self,
        format: &FrameFormatConfig,
        frame: &[u8],
        segment: &[u8],
        data: &mut ParsedFrameData,
    ) -> Result<()>;

    /// `Ok(true)` when the checksum matches or none is configured
    fn verify_checksum(&self, format: &FrameFormatConfig, frame: &[u8]) -> Result<bool>;

    /// Run the full pipeline; never panics and never returns an error type
    fn decode(&self, format: &FrameFormatConfig, frame: &[u8]) -> ParseResult {
        let frame_length = frame.len();
        let frame_type = self.frame_type();

        if frame.is_empty() {
            return ParseResult::failure(ErrorCode::InvalidDataFormat, "empty frame", 0);
        }
        if format.frame_type != frame_type {
            return ParseResult::failure(
                ErrorCode::InvalidDataFormat,
                format!(
                    "{} decoder cannot decode {} frames",
                    frame_type, format.frame_type
                ),
                frame_length,
            );
        }

        trace!(%frame_type, len = frame_length, frame = %encode_spaced(frame), "Decoding frame");

        if let Err(e) = self.validate_frame(format, frame) {
            debug!(%frame_type, "Frame validation failed: {}", e);
            return ParseResult::failure(ErrorCode::InvalidDataFormat, e.to_string(), frame_length);
        }

        let segment = match self.extract_segment(format, frame) {
            Ok(segment) if !segment.is_empty() => segment,
            Ok(_) => {
                debug!(%frame_type, "Extracted payload is empty");
                return ParseResult::failure(
                    ErrorCode::ParseFailed,
                    "extracted payload is empty",
                    frame_length,
                );
            },
            Err(e) => {
                debug!(%frame_type, "Payload extraction failed: {}", e);
                return ParseResult::failure(ErrorCode::ParseFailed, e.to_string(), frame_length);
            },
        };

        let mut data = ParsedFrameData::new();
        let reading = match self
            .decode_fields(format, frame, segment, &mut data)
            .and_then(|()| data.finish())
        {
            Ok(reading) => reading,
            Err(e) => {
                debug!(%frame_type, "Field decoding failed: {}", e);
                return ParseResult::failure(ErrorCode::ParseFailed, e.to_string(), frame_length);
            },
        };

        match self.verify_checksum(format, frame) {
            Ok(true) => {
                debug!(
                    %frame_type,
                    weight = reading.weight,
                    unit = %reading.unit,
                    stable = reading.stable,
                    "Frame decoded"
                );
                ParseResult::success(reading, frame_length)
            },
            Ok(false) => {
                debug!(%frame_type, "Checksum verification failed");
                ParseResult::checksum_failure(reading, frame_length)
            },
            Err(e) => {
                debug!(%frame_type, "Checksum verification error: {}", e);
                ParseResult::failure(ErrorCode::ParseFailed, e.to_string(), frame_length)
            },
        }
    }
}
