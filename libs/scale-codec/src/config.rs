//! Frame format configuration
//!
//! A `FrameFormatConfig` describes one device model's wire frame: which
//! decoder handles it, its length bounds and literal markers, the checksum
//! scheme and the ordered list of fields to decode. It is loaded once (usually
//! as part of a `DeviceProfile` document) and treated as read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use scale_common::serde_helpers::{
    deserialize_bool_flexible, deserialize_scale, hex_bytes_opt, scale_one,
};

use crate::bytes::{ByteOrder, WordOrder};
use crate::error::{DecodeError, Result};

// ============================================================================
// Frame Type
// ============================================================================

/// Wire format family, selects the decoder in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameType {
    /// Printable ASCII line with fields at fixed byte ranges
    #[serde(alias = "ASCII")]
    AsciiFixed,
    /// Delimiter separated ASCII tokens
    #[serde(alias = "ASCII_DELIMITED")]
    AsciiVariable,
    /// Fixed layout binary frame
    #[serde(alias = "HEX", alias = "BINARY")]
    HexFixed,
    /// Modbus RTU read-register response
    #[serde(alias = "MODBUS")]
    ModbusRtu,
}

impl FrameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameType::AsciiFixed => "ASCII_FIXED",
            FrameType::AsciiVariable => "ASCII_VARIABLE",
            FrameType::HexFixed => "HEX_FIXED",
            FrameType::ModbusRtu => "MODBUS_RTU",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Field Definition
// ============================================================================

/// Semantic role of a configured field
///
/// Unrecognized roles deserialize to `Unknown` and are skipped at decode time,
/// so newer profiles keep working with older decoders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldRole {
    Sign,
    Weight,
    Unit,
    /// Stability flag; profiles may also call it `status`
    Stable,
    Tare,
    Gross,
    Net,
    Unknown(String),
}

impl FieldRole {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "sign" => FieldRole::Sign,
            "weight" => FieldRole::Weight,
            "unit" => FieldRole::Unit,
            "stable" | "status" | "stability" => FieldRole::Stable,
            "tare" => FieldRole::Tare,
            "gross" => FieldRole::Gross,
            "net" => FieldRole::Net,
            _ => FieldRole::Unknown(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldRole::Sign => "sign",
            FieldRole::Weight => "weight",
            FieldRole::Unit => "unit",
            FieldRole::Stable => "stable",
            FieldRole::Tare => "tare",
            FieldRole::Gross => "gross",
            FieldRole::Net => "net",
            FieldRole::Unknown(name) => name,
        }
    }
}

impl From<String> for FieldRole {
    fn from(value: String) -> Self {
        FieldRole::parse(&value)
    }
}

impl From<FieldRole> for String {
    fn from(role: FieldRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric encoding of a binary or register field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// Unsigned (or `signed`) integer, width taken from the field length
    #[default]
    #[serde(alias = "INT")]
    Integer,
    Int16,
    Uint16,
    Int32,
    Uint32,
    #[serde(alias = "FLOAT32")]
    Float,
    #[serde(alias = "FLOAT64")]
    Double,
    Bcd,
}

impl DataType {
    /// Registers occupied when the profile does not say
    pub fn default_register_count(&self) -> u16 {
        match self {
            DataType::Int16 | DataType::Uint16 | DataType::Integer | DataType::Bcd => 1,
            DataType::Int32 | DataType::Uint32 | DataType::Float => 2,
            DataType::Double => 4,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Integer => "INTEGER",
            DataType::Int16 => "INT16",
            DataType::Uint16 => "UINT16",
            DataType::Int32 => "INT32",
            DataType::Uint32 => "UINT32",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Bcd => "BCD",
        };
        f.write_str(s)
    }
}

fn default_length() -> usize {
    1
}

/// One field of a frame and how to turn its bytes into a reading value
///
/// Which position attribute applies depends on the frame type:
/// `offset`/`length` for fixed layouts, `index` for delimited tokens,
/// `register`/`register_count` for Modbus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(alias = "name")]
    pub role: FieldRole,

    /// Byte offset (ASCII-fixed: within the payload; HEX-fixed: within the frame)
    #[serde(default)]
    pub offset: usize,

    /// Byte length
    #[serde(default = "default_length")]
    pub length: usize,

    /// Token index for delimited frames
    #[serde(default)]
    pub index: usize,

    /// Register offset into the Modbus payload (2 bytes per register)
    #[serde(default)]
    pub register: u16,

    /// Registers spanned; defaults by data type
    #[serde(default)]
    pub register_count: Option<u16>,

    #[serde(default)]
    pub data_type: DataType,

    /// Digits to move the decimal point left by
    #[serde(default)]
    pub decimal_places: u32,

    #[serde(default = "scale_one", deserialize_with = "deserialize_scale")]
    pub scale_factor: f64,

    /// Two's complement correction for INTEGER fields
    #[serde(default, deserialize_with = "deserialize_bool_flexible")]
    pub signed: bool,

    /// Overrides the frame default byte order
    #[serde(default)]
    pub byte_order: Option<ByteOrder>,

    /// Overrides the frame default word order (Modbus)
    #[serde(default)]
    pub word_order: Option<WordOrder>,

    /// Status bit for stable fields (default bit 0)
    #[serde(default)]
    pub bit_position: Option<u8>,

    /// Literal value → semantic value table (unit codes, stability codes)
    #[serde(default)]
    pub mapping: Option<BTreeMap<String, String>>,
}

impl FieldDefinition {
    pub fn new(role: FieldRole) -> Self {
        Self {
            role,
            offset: 0,
            length: 1,
            index: 0,
            register: 0,
            register_count: None,
            data_type: DataType::Integer,
            decimal_places: 0,
            scale_factor: 1.0,
            signed: false,
            byte_order: None,
            word_order: None,
            bit_position: None,
            mapping: None,
        }
    }

    /// Fixed byte range
    pub fn at(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// Token position in a delimited frame
    pub fn token(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Register range in a Modbus payload
    pub fn registers(mut self, register: u16, count: u16) -> Self {
        self.register = register;
        self.register_count = Some(count);
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_decimals(mut self, places: u32) -> Self {
        self.decimal_places = places;
        self
    }

    pub fn with_scale(mut self, factor: f64) -> Self {
        self.scale_factor = factor;
        self
    }

    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    pub fn with_word_order(mut self, order: WordOrder) -> Self {
        self.word_order = Some(order);
        self
    }

    pub fn with_bit(mut self, bit: u8) -> Self {
        self.bit_position = Some(bit);
        self
    }

    pub fn with_mapping<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.mapping = Some(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Byte order for this field, falling back to the frame default
    pub fn effective_byte_order(&self, frame_default: ByteOrder) -> ByteOrder {
        self.byte_order.unwrap_or(frame_default)
    }

    /// Exclusive end of the byte range, `None` on overflow
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }

    /// Look up a literal key in the mapping table
    pub fn map_text(&self, key: &str) -> Option<&str> {
        self.mapping
            .as_ref()
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }

    /// Look up a numeric code; keys may be written as `"1"`, `"0x01"` or `"01"`
    pub fn map_code(&self, code: u64) -> Option<&str> {
        let mapping = self.mapping.as_ref()?;
        let candidates = [
            code.to_string(),
            format!("0x{:02X}", code),
            format!("0x{:02x}", code),
            format!("{:02X}", code),
        ];
        candidates
            .iter()
            .find_map(|key| mapping.get(key))
            .map(String::as_str)
    }
}

// ============================================================================
// Checksum Configuration
// ============================================================================

/// Checksum algorithm tag
///
/// `Crc16` and `ModbusCrc` are two spellings of the same algorithm
/// (polynomial 0xA001 reflected, initial value 0xFFFF, low byte first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChecksumAlgorithm {
    #[default]
    None,
    Xor,
    #[serde(alias = "ADD", alias = "SUM8")]
    Sum,
    Crc16,
    ModbusCrc,
    /// Any tag this decoder does not implement
    #[serde(other)]
    Unsupported,
}

impl ChecksumAlgorithm {
    /// Number of checksum bytes carried in the frame
    pub fn width(&self) -> usize {
        match self {
            ChecksumAlgorithm::None | ChecksumAlgorithm::Unsupported => 0,
            ChecksumAlgorithm::Xor | ChecksumAlgorithm::Sum => 1,
            ChecksumAlgorithm::Crc16 | ChecksumAlgorithm::ModbusCrc => 2,
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChecksumAlgorithm::None => "NONE",
            ChecksumAlgorithm::Xor => "XOR",
            ChecksumAlgorithm::Sum => "SUM",
            ChecksumAlgorithm::Crc16 => "CRC16",
            ChecksumAlgorithm::ModbusCrc => "MODBUS_CRC",
            ChecksumAlgorithm::Unsupported => "UNSUPPORTED",
        };
        f.write_str(s)
    }
}

/// Checksum algorithm, covered range and position
///
/// The checksum covers frame bytes `[start, end)` and is stored at `position`.
/// A missing `end` means "up to the checksum position"; a missing `position`
/// means "right before the trailer".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChecksumConfig {
    #[serde(default, alias = "type")]
    pub algorithm: ChecksumAlgorithm,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
    #[serde(default)]
    pub position: Option<usize>,
}

impl ChecksumConfig {
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    pub fn covering(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = Some(end);
        self
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.algorithm != ChecksumAlgorithm::None
    }
}

// ============================================================================
// Frame Format Configuration
// ============================================================================

/// Declarative description of one device model's frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameFormatConfig {
    pub frame_type: FrameType,

    /// Exact frame length in bytes
    #[serde(default)]
    pub frame_length: Option<usize>,

    /// Minimum frame length in bytes
    #[serde(default)]
    pub min_length: Option<usize>,

    /// Literal header bytes expected at offset 0 (binary frames)
    #[serde(default, with = "hex_bytes_opt")]
    pub header: Option<Vec<u8>>,

    /// Literal trailer bytes expected at the end (binary frames)
    #[serde(default, with = "hex_bytes_opt")]
    pub trailer: Option<Vec<u8>>,

    /// Bytes dropped from the front before field decoding (ASCII-fixed)
    #[serde(default)]
    pub header_length: usize,

    /// Bytes dropped from the back before field decoding (ASCII-fixed)
    #[serde(default)]
    pub trailer_length: usize,

    /// Token delimiter (ASCII-variable); `,` when absent
    #[serde(default)]
    pub delimiter: Option<String>,

    /// Literal prefix stripped before splitting (ASCII-variable)
    #[serde(default)]
    pub prefix: Option<String>,

    /// Literal suffix stripped before splitting (ASCII-variable)
    #[serde(default)]
    pub suffix: Option<String>,

    /// Minimum token count after splitting (ASCII-variable)
    #[serde(default)]
    pub min_tokens: Option<usize>,

    #[serde(default)]
    pub checksum: Option<ChecksumConfig>,

    /// Default byte order for multi-byte fields
    #[serde(default)]
    pub byte_order: ByteOrder,

    /// Default register order for 32/64-bit Modbus values
    #[serde(default)]
    pub word_order: WordOrder,

    /// Expected Modbus slave address
    #[serde(default)]
    pub slave_id: Option<u8>,

    /// Expected Modbus function code
    #[serde(default)]
    pub function_code: Option<u8>,

    /// Ordered field list
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FrameFormatConfig {
    pub fn new(frame_type: FrameType) -> Self {
        Self {
            frame_type,
            frame_length: None,
            min_length: None,
            header: None,
            trailer: None,
            header_length: 0,
            trailer_length: 0,
            delimiter: None,
            prefix: None,
            suffix: None,
            min_tokens: None,
            checksum: None,
            byte_order: ByteOrder::default(),
            word_order: WordOrder::default(),
            slave_id: None,
            function_code: None,
            fields: Vec::new(),
        }
    }

    pub fn with_frame_length(mut self, len: usize) -> Self {
        self.frame_length = Some(len);
        self
    }

    pub fn with_min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn with_header(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.header = Some(bytes.into());
        self
    }

    pub fn with_trailer(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.trailer = Some(bytes.into());
        self
    }

    pub fn with_header_length(mut self, len: usize) -> Self {
        self.header_length = len;
        self
    }

    pub fn with_trailer_length(mut self, len: usize) -> Self {
        self.trailer_length = len;
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_min_tokens(mut self, count: usize) -> Self {
        self.min_tokens = Some(count);
        self
    }

    pub fn with_checksum(mut self, checksum: ChecksumConfig) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_word_order(mut self, order: WordOrder) -> Self {
        self.word_order = order;
        self
    }

    pub fn with_slave_id(mut self, slave_id: u8) -> Self {
        self.slave_id = Some(slave_id);
        self
    }

    pub fn with_function_code(mut self, function_code: u8) -> Self {
        self.function_code = Some(function_code);
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Literal header length in bytes
    pub fn header_bytes(&self) -> usize {
        self.header.as_ref().map_or(0, Vec::len)
    }

    /// Literal trailer length in bytes
    pub fn trailer_bytes(&self) -> usize {
        self.trailer.as_ref().map_or(0, Vec::len)
    }

    /// Configured checksum algorithm, `None` when absent
    pub fn checksum_algorithm(&self) -> ChecksumAlgorithm {
        self.checksum
            .as_ref()
            .map_or(ChecksumAlgorithm::None, |c| c.algorithm)
    }

    /// Exact / minimum length checks shared by every format
    pub fn check_length(&self, len: usize) -> Result<()> {
        if let Some(exact) = self.frame_length {
            if len != exact {
                return Err(DecodeError::invalid_format(format!(
                    "frame length {} does not match expected {}",
                    len, exact
                )));
            }
        }
        if let Some(min) = self.min_length {
            if len < min {
                return Err(DecodeError::invalid_format(format!(
                    "frame length {} below minimum {}",
                    len, min
                )));
            }
        }
        Ok(())
    }

    /// At least one field must be configured for any format
    pub fn require_fields(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(DecodeError::invalid_format("no fields configured"));
        }
        Ok(())
    }

    /// Static sanity checks on a profile, independent of any frame
    ///
    /// Returns human readable problems; an empty list means the profile is usable.
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.fields.is_empty() {
            problems.push("no fields configured".to_string());
        }
        if !self.fields.iter().any(|f| f.role == FieldRole::Weight) {
            problems.push("no weight field configured".to_string());
        }
        if let (Some(exact), Some(min)) = (self.frame_length, self.min_length) {
            if min > exact {
                problems.push(format!(
                    "min_length {} exceeds frame_length {}",
                    min, exact
                ));
            }
        }

        for field in &self.fields {
            if let FieldRole::Unknown(name) = &field.role {
                problems.push(format!("field role '{}' is not recognized and will be ignored", name));
            }
            if field.length == 0 && matches!(self.frame_type, FrameType::AsciiFixed | FrameType::HexFixed) {
                problems.push(format!("field '{}' has zero length", field.role));
            }
            if let Some(exact) = self.frame_length {
                if self.frame_type == FrameType::HexFixed
                    && field.end().map_or(true, |end| end > exact)
                {
                    problems.push(format!(
                        "field '{}' [{}..{}) lies outside the {}-byte frame",
                        field.role,
                        field.offset,
                        field.offset.saturating_add(field.length),
                        exact
                    ));
                }
            }
            if matches!(field.bit_position, Some(bit) if bit > 15) {
                problems.push(format!("field '{}' bit position above 15", field.role));
            }
        }

        if let Some(checksum) = &self.checksum {
            if let (Some(end), true) = (checksum.end, checksum.is_enabled()) {
                if end < checksum.start {
                    problems.push(format!(
                        "checksum range end {} before start {}",
                        end, checksum.start
                    ));
                }
            }
            if checksum.algorithm == ChecksumAlgorithm::Unsupported {
                problems.push("checksum algorithm is not supported and will be skipped".to_string());
            }
            if self.frame_type == FrameType::AsciiVariable && checksum.is_enabled() {
                problems.push("delimited frames only support checksum NONE".to_string());
            }
        }

        if self.frame_type == FrameType::AsciiVariable
            && self.delimiter.as_deref().is_some_and(str::is_empty)
        {
            problems.push("delimiter must not be empty".to_string());
        }

        problems
    }
}

// ============================================================================
// Device Profile
// ============================================================================

fn default_version() -> String {
    "1".to_string()
}

/// Versioned per-device-model document wrapping a frame format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Device model identifier, e.g. "acme-ws300"
    pub model: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frame: FrameFormatConfig,
}

impl DeviceProfile {
    /// Load a profile document from YAML, JSON or TOML
    pub fn load(path: impl AsRef<Path>) -> scale_common::Result<Self> {
        scale_common::config::load_config_from_file(path)
    }

    /// Write the profile in the format given by the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> scale_common::Result<()> {
        scale_common::config::save_config_to_file(self, path)
    }
}
