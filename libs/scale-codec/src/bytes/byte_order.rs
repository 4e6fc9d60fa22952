//! Byte and word order representation for multi-byte field values
//!
//! Scale controllers disagree on endianness: most binary protocols are
//! big-endian, several Asian indicator brands send little-endian weights, and
//! PLC-style Modbus devices frequently swap the two 16-bit words of a 32-bit
//! value.

use serde::{Deserialize, Serialize};

/// Unified byte/word order representation for 16/32/64-bit values
///
/// # Naming Convention
/// Uses ABCD notation where A is the most significant byte. For the 32-bit
/// value `0x12345678` the wire bytes are:
/// - `BigEndian (ABCD)`: [0x12, 0x34, 0x56, 0x78]
/// - `LittleEndian (DCBA)`: [0x78, 0x56, 0x34, 0x12]
/// - `BigEndianSwap (CDAB)`: [0x56, 0x78, 0x12, 0x34]
/// - `LittleEndianSwap (BADC)`: [0x34, 0x12, 0x78, 0x56]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ByteOrder {
    /// Big-endian: ABCD (most significant byte first)
    #[default]
    BigEndian,

    /// Little-endian: DCBA (least significant byte first)
    LittleEndian,

    /// Big-endian with swapped words: CDAB
    BigEndianSwap,

    /// Little-endian with swapped words: BADC
    LittleEndianSwap,
}

impl ByteOrder {
    /// Parse the string forms used in device profiles
    ///
    /// - "BIG_ENDIAN", "BE", "ABCD" → BigEndian
    /// - "LITTLE_ENDIAN", "LE", "DCBA" → LittleEndian
    /// - "BIG_ENDIAN_SWAP", "CDAB" → BigEndianSwap
    /// - "LITTLE_ENDIAN_SWAP", "BADC" → LittleEndianSwap
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace('-', "");
        match normalized.as_str() {
            "ABCD" | "BE" | "BIG_ENDIAN" | "BIGENDIAN" | "ABCDEFGH" => Some(Self::BigEndian),
            "DCBA" | "LE" | "LITTLE_ENDIAN" | "LITTLEENDIAN" | "HGFEDCBA" => {
                Some(Self::LittleEndian)
            },
            "CDAB" | "BIG_ENDIAN_SWAP" | "BIGENDIANSWAP" => Some(Self::BigEndianSwap),
            "BADC" | "LITTLE_ENDIAN_SWAP" | "LITTLEENDIANSWAP" => Some(Self::LittleEndianSwap),
            _ => None,
        }
    }

    /// Canonical profile spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BigEndian => "BIG_ENDIAN",
            Self::LittleEndian => "LITTLE_ENDIAN",
            Self::BigEndianSwap => "BIG_ENDIAN_SWAP",
            Self::LittleEndianSwap => "LITTLE_ENDIAN_SWAP",
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for ByteOrder {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown byte order '{}'", value))
    }
}

impl From<ByteOrder> for String {
    fn from(order: ByteOrder) -> Self {
        order.as_str().to_string()
    }
}

/// Order of the 16-bit registers making up a 32/64-bit Modbus value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WordOrder {
    /// Most significant register first (Modbus default)
    #[default]
    #[serde(alias = "BIG_ENDIAN", alias = "HIGH_FIRST")]
    HighWordFirst,
    /// Least significant register first
    #[serde(alias = "LITTLE_ENDIAN", alias = "LOW_FIRST")]
    LowWordFirst,
}
