//! Scale Codec - configuration-driven frame decoder for industrial weighing scales
//!
//! Turns one delimited wire frame plus a per-device-model
//! [`FrameFormatConfig`] into a canonical [`ParseResult`]:
//!
//! - `bytes`: byte order handling, integer/float/BCD conversion, bit extraction
//! - `checksum`: XOR, SUM and Modbus CRC16
//! - `formats`: ASCII-fixed, ASCII-variable, HEX-fixed and Modbus RTU decoders
//! - `decoder`: the shared 5-step decode pipeline
//! - `registry`: frame type → decoder lookup and the top-level [`decode`]
//! - `modbus`: read-register request builder and exception descriptions
//!
//! ```ignore
//! use scale_codec::{decode, DeviceProfile};
//!
//! let profile = DeviceProfile::load("profiles/indicator.yaml")?;
//! let result = decode(&profile.frame, b"+001240 kg S\r\n");
//! assert_eq!(result.weight(), Some(12.4));
//! ```

pub mod bytes;
pub mod checksum;
pub mod config;
pub mod decoder;
pub mod error;
pub mod formats;
pub mod modbus;
pub mod reading;
pub mod registry;

pub use config::{
    ChecksumAlgorithm, ChecksumConfig, DataType, DeviceProfile, FieldDefinition, FieldRole,
    FrameFormatConfig, FrameType,
};
pub use decoder::FrameDecoder;
pub use error::{DecodeError, ErrorCode};
pub use reading::{ParseResult, ParsedFrameData, Reading};
pub use registry::{create_default_registry, decode, default_registry, FormatRegistry};

/// Common imports for decoder users
pub mod prelude {
    pub use crate::bytes::{ByteOrder, WordOrder};
    pub use crate::config::{
        ChecksumAlgorithm, ChecksumConfig, DataType, DeviceProfile, FieldDefinition, FieldRole,
        FrameFormatConfig, FrameType,
    };
    pub use crate::decoder::FrameDecoder;
    pub use crate::error::ErrorCode;
    pub use crate::reading::ParseResult;
    pub use crate::registry::decode;
}
