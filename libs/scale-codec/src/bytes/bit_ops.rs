//! Bit-level operations for status bytes and registers

/// Extract single bit from u8 value; out of range positions read as clear
#[inline]
pub fn extract_bit_u8(value: u8, bit_index: u8) -> bool {
    bit_index < 8 && (value & (1 << bit_index)) != 0
}

/// Extract single bit from u16 value; out of range positions read as clear
#[inline]
pub fn extract_bit_u16(value: u16, bit_index: u8) -> bool {
    bit_index < 16 && (value & (1 << bit_index)) != 0
}

/// High (sign) bit of a byte
#[inline]
pub fn high_bit_u8(value: u8) -> bool {
    value & 0x80 != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bit_u8() {
        let value = 0b1010_1100u8;
        assert!(!extract_bit_u8(value, 0));
        assert!(extract_bit_u8(value, 2));
        assert!(extract_bit_u8(value, 7));
        assert!(!extract_bit_u8(value, 8));
    }

    #[test]
    fn test_extract_bit_u16() {
        assert!(extract_bit_u16(0x8001, 0));
        assert!(extract_bit_u16(0x8001, 15));
        assert!(!extract_bit_u16(0x8001, 16));
    }

    #[test]
    fn test_high_bit() {
        assert!(high_bit_u8(0x80));
        assert!(high_bit_u8(0xFF));
        assert!(!high_bit_u8(0x7F));
    }
}
