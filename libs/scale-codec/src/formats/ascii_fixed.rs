//! Fixed-width ASCII frames
//!
//! Typical indicator output such as `+001240 kg S\r\n`, where every field
//! occupies a fixed byte range. Field offsets are relative to the payload left
//! after dropping `header_length` and `trailer_length` bytes.

use tracing::debug;

use super::text::{decode_measure, is_frame_byte, resolve_stable};
use super::{field_slice, warn_out_of_bounds};
use crate::checksum;
use crate::config::{FieldRole, FrameFormatConfig, FrameType};
use crate::decoder::FrameDecoder;
use crate::error::{DecodeError, Result};
use crate::reading::ParsedFrameData;

/// Decoder for `ASCII_FIXED` frames
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiFixedDecoder;

impl FrameDecoder for AsciiFixedDecoder {
    fn frame_type(&self) -> FrameType {
        FrameType::AsciiFixed
    }

    fn validate_frame(&self, format: &FrameFormatConfig, frame: &[u8]) -> Result<()> {
        format.check_length(frame.len())?;

        if let Some(pos) = frame.iter().position(|&b| !is_frame_byte(b)) {
            return Err(DecodeError::invalid_format(format!(
                "non-printable byte 0x{:02X} at offset {}",
                frame[pos], pos
            )));
        }

        format.require_fields()
    }

    fn extract_segment<'a>(&self, format: &FrameFormatConfig, frame: &'a [u8]) -> Result<&'a [u8]> {
        let end = frame
            .len()
            .checked_sub(format.trailer_length)
            .filter(|&end| end >= format.header_length)
            .ok_or_else(|| {
                DecodeError::parse(format!(
                    "{}-byte frame shorter than header ({}) plus trailer ({})",
                    frame.len(),
                    format.header_length,
                    format.trailer_length
                ))
            })?;
        Ok(&frame[format.header_length..end])
    }

    fn decode_fields(
        &self,
        format: &FrameFormatConfig,
        _frame: &[u8],
        segment: &[u8],
        data: &mut ParsedFrameData,
    ) -> Result<()> {
        for field in &format.fields {
            let Some(bytes) = field_slice(field, segment) else {
                warn_out_of_bounds(field, segment.len());
                continue;
            };
            let text = std::str::from_utf8(bytes)
                .map_err(|e| DecodeError::parse(format!("{} is not text: {}", field.role, e)))?;

            match &field.role {
                FieldRole::Sign => data.negative = text.starts_with('-'),
                FieldRole::Weight | FieldRole::Tare | FieldRole::Gross | FieldRole::Net => {
                    let value = decode_measure(field, text, true)?;
                    data.set_measure(&field.role, value);
                },
                FieldRole::Unit => {
                    let unit = text.trim();
                    let unit = field.map_text(unit).unwrap_or(unit);
                    if !unit.is_empty() {
                        data.unit = Some(unit.to_string());
                    }
                },
                FieldRole::Stable => data.stable = resolve_stable(field, text, false),
                FieldRole::Unknown(name) => debug!("Ignoring field with unknown role '{}'", name),
            }
        }
        Ok(())
    }

    fn verify_checksum(&self, format: &FrameFormatConfig, frame: &[u8]) -> Result<bool> {
        match &format.checksum {
            Some(config) => checksum::verify_range(frame, config, format.trailer_length),
            None => Ok(true),
        }
    }
}
