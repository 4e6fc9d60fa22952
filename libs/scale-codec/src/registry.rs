//! Format registry
//!
//! Maps a [`FrameType`] to the decoder implementing it. The built-in decoders
//! are registered in [`create_default_registry`]; adding a new wire format
//! means implementing [`FrameDecoder`] and registering it there.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::config::{FrameFormatConfig, FrameType};
use crate::decoder::FrameDecoder;
use crate::error::ErrorCode;
use crate::formats::{AsciiFixedDecoder, AsciiVariableDecoder, HexFixedDecoder, ModbusRtuDecoder};
use crate::reading::ParseResult;

// ============================================================================
// Format Registry
// ============================================================================

/// Frame type → decoder lookup
#[derive(Default)]
pub struct FormatRegistry {
    decoders: HashMap<FrameType, Arc<dyn FrameDecoder>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder under the frame type it reports
    pub fn register(&mut self, decoder: Arc<dyn FrameDecoder>) {
        self.register_as(decoder.frame_type(), decoder);
    }

    /// Register a decoder under an explicit frame type
    pub fn register_as(&mut self, frame_type: FrameType, decoder: Arc<dyn FrameDecoder>) {
        debug!(%frame_type, "Registering frame decoder");
        self.decoders.insert(frame_type, decoder);
    }

    /// Decoder for a frame type
    pub fn decoder_for(&self, frame_type: FrameType) -> Option<&dyn FrameDecoder> {
        self.decoders.get(&frame_type).map(|d| d.as_ref())
    }

    pub fn is_registered(&self, frame_type: FrameType) -> bool {
        self.decoders.contains_key(&frame_type)
    }

    /// Registered frame types, sorted by name
    pub fn frame_types(&self) -> Vec<FrameType> {
        let mut types: Vec<FrameType> = self.decoders.keys().copied().collect();
        types.sort_by_key(|t| t.as_str());
        types
    }

    /// Decode one frame with the decoder registered for `format.frame_type`
    pub fn decode(&self, format: &FrameFormatConfig, frame: &[u8]) -> ParseResult {
        match self.decoder_for(format.frame_type) {
            Some(decoder) => decoder.decode(format, frame),
            None => ParseResult::failure(
                ErrorCode::InvalidDataFormat,
                format!("no decoder registered for {}", format.frame_type),
                frame.len(),
            ),
        }
    }
}

// ============================================================================
// Registry Initialization
// ============================================================================

/// Create a registry with all built-in decoders registered
pub fn create_default_registry() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(Arc::new(AsciiFixedDecoder));
    registry.register(Arc::new(AsciiVariableDecoder));
    registry.register(Arc::new(HexFixedDecoder));
    registry.register(Arc::new(ModbusRtuDecoder));
    registry
}

/// Process-wide registry of the built-in decoders
pub fn default_registry() -> &'static FormatRegistry {
    static REGISTRY: OnceLock<FormatRegistry> = OnceLock::new();
    REGISTRY.get_or_init(create_default_registry)
}

/// Decode one frame against its format configuration
pub fn decode(format: &FrameFormatConfig, frame: &[u8]) -> ParseResult {
    default_registry().decode(format, frame)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::config::{FieldDefinition, FieldRole};

    #[test]
    fn test_default_registry_covers_every_frame_type() {
        let registry = create_default_registry();
        for frame_type in [
            FrameType::AsciiFixed,
            FrameType::AsciiVariable,
            FrameType::HexFixed,
            FrameType::ModbusRtu,
        ] {
            assert!(registry.is_registered(frame_type));
            assert_eq!(registry.decoder_for(frame_type).unwrap().frame_type(), frame_type);
        }
        assert_eq!(registry.frame_types().len(), 4);
    }

    #[test]
    fn test_empty_registry_reports_invalid_format() {
        let registry = FormatRegistry::new();
        let format = FrameFormatConfig::new(FrameType::HexFixed)
            .with_field(FieldDefinition::new(FieldRole::Weight).at(0, 1));
        let result = registry.decode(&format, &[0x01]);
        assert_eq!(result.error_code(), Some(ErrorCode::InvalidDataFormat));
    }

    #[test]
    fn test_mismatched_decoder_reports_invalid_format() {
        let mut registry = FormatRegistry::new();
        registry.register_as(FrameType::HexFixed, Arc::new(AsciiFixedDecoder));

        let format = FrameFormatConfig::new(FrameType::HexFixed)
            .with_field(FieldDefinition::new(FieldRole::Weight).at(0, 1));
        let result = registry.decode(&format, b"1");
        assert_eq!(result.error_code(), Some(ErrorCode::InvalidDataFormat));
        assert!(result.error_message().unwrap().contains("cannot decode"));
    }

    #[test]
    fn test_empty_input() {
        let format = FrameFormatConfig::new(FrameType::AsciiFixed);
        let result = decode(&format, &[]);
        assert_eq!(result.error_code(), Some(ErrorCode::InvalidDataFormat));
        assert_eq!(result.frame_length(), 0);
    }
}
