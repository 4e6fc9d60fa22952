//! Modbus RTU read-register responses
//!
//! Frame layout for functions 0x03/0x04:
//!
//! ```text
//! | slave | function | byte count | registers (2 bytes each) ... | CRC lo | CRC hi |
//! ```
//!
//! Field `register` values index 16-bit words in the register payload. The CRC
//! is always verified, regardless of the profile checksum setting.

use tracing::{debug, warn};

use super::binary::decode_number;
use super::text::is_stable_token;
use crate::bytes::{extract_bit_u16, swap_words, WordOrder};
use crate::checksum::verify_crc16_trailer;
use crate::config::{FieldDefinition, FieldRole, FrameFormatConfig, FrameType};
use crate::decoder::FrameDecoder;
use crate::error::{DecodeError, Result};
use crate::modbus::{
    exception_description, is_exception_function, is_register_read, EXCEPTION_FLAG,
    MIN_RESPONSE_LEN,
};
use crate::reading::ParsedFrameData;

/// Decoder for `MODBUS_RTU` frames
#[derive(Debug, Default, Clone, Copy)]
pub struct ModbusRtuDecoder;

/// Unit register codes used by most Modbus weighing indicators
pub fn default_unit(code: u16) -> Option<&'static str> {
    match code {
        0 => Some("kg"),
        1 => Some("g"),
        2 => Some("lb"),
        3 => Some("oz"),
        4 => Some("t"),
        _ => None,
    }
}

/// Register bytes covered by a field, `None` when outside the payload
fn register_slice<'a>(field: &FieldDefinition, payload: &'a [u8]) -> Option<&'a [u8]> {
    let count = field
        .register_count
        .unwrap_or_else(|| field.data_type.default_register_count());
    if count == 0 {
        return None;
    }
    let start = usize::from(field.register) * 2;
    payload.get(start..start + usize::from(count) * 2)
}

impl FrameDecoder for ModbusRtuDecoder {
    fn frame_type(&self) -> FrameType {
        FrameType::ModbusRtu
    }

    fn validate_frame(&self, format: &FrameFormatConfig, frame: &[u8]) -> Result<()> {
        if frame.len() < MIN_RESPONSE_LEN {
            return Err(DecodeError::invalid_format(format!(
                "Modbus frame of {} bytes, at least {} required",
                frame.len(),
                MIN_RESPONSE_LEN
            )));
        }

        let (slave_id, function_code) = (frame[0], frame[1]);

        // Exception responses are shorter than any configured data frame
        if is_exception_function(function_code) {
            let exception_code = frame[2];
            return Err(DecodeError::invalid_format(format!(
                "Modbus exception response: function 0x{:02X}, exception 0x{:02X} ({})",
                function_code & !EXCEPTION_FLAG,
                exception_code,
                exception_description(exception_code)
            )));
        }

        format.check_length(frame.len())?;

        if let Some(expected) = format.slave_id {
            if slave_id != expected {
                return Err(DecodeError::invalid_format(format!(
                    "slave id {} does not match expected {}",
                    slave_id, expected
                )));
            }
        }
        if let Some(expected) = format.function_code {
            if function_code != expected {
                return Err(DecodeError::invalid_format(format!(
                    "function code 0x{:02X} does not match expected 0x{:02X}",
                    function_code, expected
                )));
            }
        }

        if is_register_read(function_code) {
            let byte_count = usize::from(frame[2]);
            let expected_len = 3 + byte_count + 2;
            if frame.len() != expected_len {
                return Err(DecodeError::invalid_format(format!(
                    "byte count {} implies a {}-byte frame, got {}",
                    byte_count,
                    expected_len,
                    frame.len()
                )));
            }
        }

        format.require_fields()
    }

    fn extract_segment<'a>(&self, _format: &FrameFormatConfig, frame: &'a [u8]) -> Result<&'a [u8]> {
        let range = if frame.len() > 2 && is_register_read(frame[1]) {
            3..3 + usize::from(frame[2])
        } else {
            2..frame.len().saturating_sub(2)
        };
        frame
            .get(range)
            .ok_or_else(|| DecodeError::parse("Modbus payload outside frame"))
    }

    fn decode_fields(
        &self,
        format: &FrameFormatConfig,
        _frame: &[u8],
        segment: &[u8],
        data: &mut ParsedFrameData,
    ) -> Result<()> {
        for field in &format.fields {
            let Some(bytes) = register_slice(field, segment) else {
                warn!(
                    field = %field.role,
                    register = field.register,
                    registers = ?field.register_count,
                    available = segment.len() / 2,
                    "Register outside payload, skipped"
                );
                continue;
            };
            let register = u16::from_be_bytes([bytes[0], bytes[1]]);

            match &field.role {
                FieldRole::Sign => data.negative = extract_bit_u16(register, 15),
                FieldRole::Weight | FieldRole::Tare | FieldRole::Gross | FieldRole::Net => {
                    let mut ordered = bytes.to_vec();
                    let word_order = field.word_order.unwrap_or(format.word_order);
                    if ordered.len() >= 4 && word_order == WordOrder::LowWordFirst {
                        swap_words(&mut ordered);
                    }
                    let order = field.effective_byte_order(format.byte_order);
                    let value = decode_number(field, &ordered, order)?;
                    data.set_measure(&field.role, value);
                },
                FieldRole::Unit => {
                    let unit = if field.mapping.is_some() {
                        field.map_code(u64::from(register))
                    } else {
                        default_unit(register)
                    };
                    match unit {
                        Some(unit) => data.unit = Some(unit.to_string()),
                        None => debug!(code = register, "Unknown unit code"),
                    }
                },
                FieldRole::Stable => {
                    data.stable = if field.mapping.is_some() {
                        field
                            .map_code(u64::from(register))
                            .is_some_and(|mapped| is_stable_token(mapped, true))
                    } else {
                        extract_bit_u16(register, field.bit_position.unwrap_or(0))
                    };
                },
                FieldRole::Unknown(name) => debug!("Ignoring field with unknown role '{}'", name),
            }
        }
        Ok(())
    }

    fn verify_checksum(&self, _format: &FrameFormatConfig, frame: &[u8]) -> Result<bool> {
        Ok(verify_crc16_trailer(frame))
    }
}
