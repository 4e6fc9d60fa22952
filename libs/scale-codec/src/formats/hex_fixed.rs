//! Fixed-layout binary frames
//!
//! A typical layout is a 2-byte header, a 4-byte weight, a unit code byte, a
//! status byte and a 1-byte checksum. Field offsets are absolute positions in
//! the original frame; the extracted data segment only bounds the payload.

use tracing::debug;

use super::binary::decode_number;
use super::text::is_stable_token;
use super::{field_slice, warn_out_of_bounds};
use crate::bytes::{bytes_to_u64, extract_bit_u8, high_bit_u8};
use crate::checksum;
use crate::config::{FieldDefinition, FieldRole, FrameFormatConfig, FrameType};
use crate::decoder::FrameDecoder;
use crate::error::{DecodeError, Result};
use crate::reading::ParsedFrameData;

use scale_common::hex::encode_spaced;

/// Decoder for `HEX_FIXED` frames
#[derive(Debug, Default, Clone, Copy)]
pub struct HexFixedDecoder;

/// Unit from a code table, else from ASCII letters in the field
fn binary_unit(field: &FieldDefinition, bytes: &[u8], format: &FrameFormatConfig) -> Option<String> {
    if field.mapping.is_some() {
        let order = field.effective_byte_order(format.byte_order);
        if let Some(unit) = bytes_to_u64(bytes, order).and_then(|code| field.map_code(code)) {
            return Some(unit.to_string());
        }
    }

    let letters = bytes
        .iter()
        .copied()
        .filter(|&b| b != 0x00 && b != b' ')
        .collect::<Vec<u8>>();
    if !letters.is_empty() && letters.iter().all(u8::is_ascii_alphabetic) {
        return String::from_utf8(letters).ok();
    }
    None
}

impl FrameDecoder for HexFixedDecoder {
    fn frame_type(&self) -> FrameType {
        FrameType::HexFixed
    }

    fn validate_frame(&self, format: &FrameFormatConfig, frame: &[u8]) -> Result<()> {
        format.check_length(frame.len())?;

        let markers = format.header_bytes() + format.trailer_bytes();
        if frame.len() < markers {
            return Err(DecodeError::invalid_format(format!(
                "frame length {} shorter than header and trailer ({} bytes)",
                frame.len(),
                markers
            )));
        }

        if let Some(header) = format.header.as_deref() {
            if !frame.starts_with(header) {
                return Err(DecodeError::invalid_format(format!(
                    "header mismatch: expected [{}], got [{}]",
                    encode_spaced(header),
                    encode_spaced(&frame[..header.len()])
                )));
            }
        }
        if let Some(trailer) = format.trailer.as_deref() {
            if !frame.ends_with(trailer) {
                return Err(DecodeError::invalid_format(format!(
                    "trailer mismatch: expected [{}], got [{}]",
                    encode_spaced(trailer),
                    encode_spaced(&frame[frame.len() - trailer.len()..])
                )));
            }
        }

        format.require_fields()
    }

    fn extract_segment<'a>(&self, format: &FrameFormatConfig, frame: &'a [u8]) -> Result<&'a [u8]> {
        let start = format.header_bytes();
        let tail = format.trailer_bytes() + format.checksum_algorithm().width();
        let end = frame
            .len()
            .checked_sub(tail)
            .filter(|&end| end >= start)
            .ok_or_else(|| {
                DecodeError::parse(format!(
                    "{}-byte frame leaves no data between header and trailer",
                    frame.len()
                ))
            })?;
        Ok(&frame[start..end])
    }

    fn decode_fields(
        &self,
        format: &FrameFormatConfig,
        frame: &[u8],
        segment: &[u8],
        data: &mut ParsedFrameData,
    ) -> Result<()> {
        debug!(data_len = segment.len(), "Decoding binary fields");

        for field in &format.fields {
            let Some(bytes) = field_slice(field, frame).filter(|b| !b.is_empty()) else {
                warn_out_of_bounds(field, frame.len());
                continue;
            };

            match &field.role {
                FieldRole::Sign => data.negative = high_bit_u8(bytes[0]),
                FieldRole::Weight | FieldRole::Tare | FieldRole::Gross | FieldRole::Net => {
                    let order = field.effective_byte_order(format.byte_order);
                    let value = decode_number(field, bytes, order)?;
                    data.set_measure(&field.role, value);
                },
                FieldRole::Unit => {
                    if let Some(unit) = binary_unit(field, bytes, format) {
                        data.unit = Some(unit);
                    }
                },
                FieldRole::Stable => {
                    data.stable = if field.mapping.is_some() {
                        field
                            .map_code(u64::from(bytes[0]))
                            .is_some_and(|mapped| is_stable_token(mapped, true))
                    } else {
                        extract_bit_u8(bytes[0], field.bit_position.unwrap_or(0))
                    };
                },
                FieldRole::Unknown(name) => debug!("Ignoring field with unknown role '{}'", name),
            }
        }
        Ok(())
    }

    fn verify_checksum(&self, format: &FrameFormatConfig, frame: &[u8]) -> Result<bool> {
        match &format.checksum {
            Some(config) => checksum::verify_range(frame, config, format.trailer_bytes()),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::bytes::ByteOrder;
    use crate::config::{ChecksumAlgorithm, ChecksumConfig, DataType};
    use crate::error::ErrorCode;
    use tracing_test::traced_test;

    fn platform_format(order: ByteOrder) -> FrameFormatConfig {
        FrameFormatConfig::new(FrameType::HexFixed)
            .with_frame_length(9)
            .with_header([0xAA, 0x55])
            .with_byte_order(order)
            .with_checksum(ChecksumConfig::new(ChecksumAlgorithm::Xor).covering(2, 8).at(8))
            .with_field(FieldDefinition::new(FieldRole::Weight).at(2, 4).with_decimals(2))
            .with_field(FieldDefinition::new(FieldRole::Unit).at(6, 1).with_mapping([("1", "kg"), ("2", "lb")]))
            .with_field(FieldDefinition::new(FieldRole::Stable).at(7, 1))
    }

    #[test]
    fn test_big_endian_weight() {
        let frame = [0xAA, 0x55, 0x00, 0x00, 0x04, 0xD2, 0x01, 0x03, 0xD4];
        let result = HexFixedDecoder.decode(&platform_format(ByteOrder::BigEndian), &frame);

        assert!(result.is_success(), "{:?}", result.error_message());
        assert_eq!(result.weight(), Some(12.34));
        assert_eq!(result.unit(), Some("kg"));
        assert_eq!(result.is_stable(), Some(true));
    }

    #[test]
    fn test_little_endian_weight_matches() {
        let frame = [0xAA, 0x55, 0xD2, 0x04, 0x00, 0x00, 0x01, 0x03, 0xD4];
        let result = HexFixedDecoder.decode(&platform_format(ByteOrder::LittleEndian), &frame);
        assert_eq!(result.weight(), Some(12.34));
    }

    #[test]
    fn test_header_mismatch() {
        let frame = [0xAB, 0x55, 0x00, 0x00, 0x04, 0xD2, 0x01, 0x03, 0xD4];
        let result = HexFixedDecoder.decode(&platform_format(ByteOrder::BigEndian), &frame);
        assert_eq!(result.error_code(), Some(ErrorCode::InvalidDataFormat));
        assert!(result.error_message().unwrap().contains("header mismatch"));
    }

    #[test]
    fn test_checksum_mismatch_keeps_values() {
        let frame = [0xAA, 0x55, 0x00, 0x00, 0x04, 0xD2, 0x02, 0x02, 0xD4];
        let result = HexFixedDecoder.decode(&platform_format(ByteOrder::BigEndian), &frame);
        assert_eq!(result.error_code(), Some(ErrorCode::ChecksumFailed));
        assert_eq!(result.weight(), Some(12.34));
        assert_eq!(result.unit(), Some("lb"));
        assert_eq!(result.is_stable(), Some(false));
    }

    #[test]
    fn test_sign_bit_bcd_and_ascii_unit() {
        let format = FrameFormatConfig::new(FrameType::HexFixed)
            .with_header([0x02])
            .with_trailer([0x03])
            .with_field(FieldDefinition::new(FieldRole::Sign).at(1, 1))
            .with_field(
                FieldDefinition::new(FieldRole::Weight)
                    .at(2, 3)
                    .with_data_type(DataType::Bcd)
                    .with_decimals(1),
            )
            .with_field(FieldDefinition::new(FieldRole::Unit).at(5, 2))
            .with_field(FieldDefinition::new(FieldRole::Stable).at(1, 1).with_bit(2));

        let frame = [0x02, 0x84, 0x00, 0x12, 0x40, b'l', b'b', 0x03];
        let result = HexFixedDecoder.decode(&format, &frame);

        assert!(result.is_success(), "{:?}", result.error_message());
        assert_eq!(result.weight(), Some(-124.0));
        assert_eq!(result.unit(), Some("lb"));
        assert_eq!(result.is_stable(), Some(true));
    }

    #[test]
    fn test_field_beyond_frame_is_skipped() {
        let format = FrameFormatConfig::new(FrameType::HexFixed)
            .with_field(FieldDefinition::new(FieldRole::Weight).at(0, 2))
            .with_field(FieldDefinition::new(FieldRole::Tare).at(4, 2));

        let result = HexFixedDecoder.decode(&format, &[0x01, 0x00, 0x00]);
        assert!(result.is_success());
        assert_eq!(result.weight(), Some(256.0));
        assert_eq!(result.tare_weight(), None);
    }

    #[test]
    #[traced_test]
    fn test_skipped_field_is_logged() {
        let format = FrameFormatConfig::new(FrameType::HexFixed)
            .with_field(FieldDefinition::new(FieldRole::Weight).at(0, 1))
            .with_field(FieldDefinition::new(FieldRole::Net).at(8, 4));

        assert!(HexFixedDecoder.decode(&format, &[0x05, 0x00]).is_success());
        assert!(logs_contain("Field outside frame bounds, skipped"));
    }

    #[test]
    fn test_unsupported_width_is_parse_failure() {
        let format = FrameFormatConfig::new(FrameType::HexFixed)
            .with_field(FieldDefinition::new(FieldRole::Weight).at(0, 3).with_data_type(DataType::Float));
        let result = HexFixedDecoder.decode(&format, &[0x41, 0xC8, 0x00]);
        assert_eq!(result.error_code(), Some(ErrorCode::ParseFailed));
    }
}
