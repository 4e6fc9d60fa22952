//! Hex encoding utility
//!
//! Frames are exchanged with operators and profile documents as hex text.

use crate::{Error, Result};
use std::fmt::Write;

/// Encode bytes to uppercase hex string
/// Example: [0x12, 0x34, 0xAB] -> "1234AB"
pub fn encode_upper(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len() * 2);
    for byte in data {
        // Writing to String buffer is infallible
        let _ = write!(&mut result, "{:02X}", byte);
    }
    result
}

/// Encode bytes as space separated uppercase pairs, the way frames are shown in logs
/// Example: [0x01, 0x03, 0x04] -> "01 03 04"
pub fn encode_spaced(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            result.push(' ');
        }
        let _ = write!(&mut result, "{:02X}", byte);
    }
    result
}

/// Decode hex text written by hand or copied from a serial monitor
///
/// Whitespace, `:`/`-`/`,` separators and `0x` prefixes are ignored, so
/// `"01 03 04"`, `"0x01,0x03,0x04"` and `"010304"` all decode to the same bytes.
pub fn decode_flexible(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text
        .split(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | ','))
        .map(|part| {
            part.strip_prefix("0x")
                .or_else(|| part.strip_prefix("0X"))
                .unwrap_or(part)
        })
        .collect();

    ::hex::decode(&cleaned)
        .map_err(|e| Error::invalid_input(format!("Invalid hex '{}': {}", text.trim(), e)))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_encode_upper_basic() {
        assert_eq!(encode_upper(&[0x12, 0x34, 0xAB]), "1234AB");
        assert_eq!(encode_upper(&[]), "");
    }

    #[test]
    fn test_encode_spaced() {
        assert_eq!(encode_spaced(&[0x01, 0x03, 0x04]), "01 03 04");
        assert_eq!(encode_spaced(&[0xFF]), "FF");
        assert_eq!(encode_spaced(&[]), "");
    }

    #[test]
    fn test_decode_flexible_separators() {
        let expected = vec![0x01, 0x03, 0x04, 0xD2];
        assert_eq!(decode_flexible("010304D2").unwrap(), expected);
        assert_eq!(decode_flexible("01 03 04 d2").unwrap(), expected);
        assert_eq!(decode_flexible("0x01,0x03,0x04,0xD2").unwrap(), expected);
        assert_eq!(decode_flexible("01:03:04:D2\n").unwrap(), expected);
    }

    #[test]
    fn test_decode_flexible_invalid() {
        assert!(decode_flexible("0").is_err());
        assert!(decode_flexible("zz").is_err());
    }
}
