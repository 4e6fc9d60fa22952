//! Wire format decoders
//!
//! One stateless decoder per [`FrameType`](crate::config::FrameType):
//!
//! | Frame type       | Decoder                  | Field position        |
//! |------------------|--------------------------|-----------------------|
//! | `ASCII_FIXED`    | [`AsciiFixedDecoder`]    | offset in the payload |
//! | `ASCII_VARIABLE` | [`AsciiVariableDecoder`] | token index           |
//! | `HEX_FIXED`      | [`HexFixedDecoder`]      | offset in the frame   |
//! | `MODBUS_RTU`     | [`ModbusRtuDecoder`]     | register in payload   |

pub mod ascii_fixed;
pub mod ascii_variable;
pub mod hex_fixed;
pub mod modbus_rtu;

mod binary;
mod text;

pub use ascii_fixed::AsciiFixedDecoder;
pub use ascii_variable::AsciiVariableDecoder;
pub use hex_fixed::HexFixedDecoder;
pub use modbus_rtu::ModbusRtuDecoder;

use tracing::warn;

use crate::config::FieldDefinition;

/// Bytes `[offset, offset + length)` of `bytes`, `None` when out of bounds
fn field_slice<'a>(field: &FieldDefinition, bytes: &'a [u8]) -> Option<&'a [u8]> {
    field.end().and_then(|end| bytes.get(field.offset..end))
}

fn warn_out_of_bounds(field: &FieldDefinition, available: usize) {
    warn!(
        field = %field.role,
        offset = field.offset,
        length = field.length,
        available,
        "Field outside frame bounds, skipped"
    );
}
