//! Binary numeric field decoding shared by the HEX and Modbus decoders

use crate::bytes::{
    bcd_to_u64, bytes_to_f32, bytes_to_f64, bytes_to_integer, shift_and_scale, ByteOrder,
};
use crate::config::{DataType, FieldDefinition};
use crate::error::{DecodeError, Result};

fn exact(bytes: &[u8], width: usize) -> Option<&[u8]> {
    (bytes.len() == width).then_some(bytes)
}

/// Decode a numeric field and apply its decimal shift and scale factor
pub(crate) fn decode_number(field: &FieldDefinition, bytes: &[u8], order: ByteOrder) -> Result<f64> {
    let width_error = || DecodeError::UnsupportedWidth {
        field: field.role.to_string(),
        data_type: field.data_type.to_string(),
        width: bytes.len(),
    };
    if bytes.is_empty() {
        return Err(width_error());
    }

    let raw = match field.data_type {
        DataType::Integer => bytes_to_integer(bytes, order, field.signed),
        DataType::Int16 => exact(bytes, 2).and_then(|b| bytes_to_integer(b, order, true)),
        DataType::Uint16 => exact(bytes, 2).and_then(|b| bytes_to_integer(b, order, false)),
        DataType::Int32 => exact(bytes, 4).and_then(|b| bytes_to_integer(b, order, true)),
        DataType::Uint32 => exact(bytes, 4).and_then(|b| bytes_to_integer(b, order, false)),
        DataType::Float => bytes_to_f32(bytes, order).map(f64::from),
        DataType::Double => bytes_to_f64(bytes, order),
        DataType::Bcd => bcd_to_u64(bytes).map(|v| v as f64),
    }
    .ok_or_else(width_error)?;

    let value = shift_and_scale(raw, field.decimal_places, field.scale_factor);
    if !value.is_finite() {
        return Err(DecodeError::parse(format!(
            "{} value of {} is not finite",
            field.data_type, field.role
        )));
    }
    Ok(value)
}
