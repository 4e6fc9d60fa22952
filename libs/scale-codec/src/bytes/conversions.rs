//! Numeric type conversions with byte order support
//!
//! Provides functions for converting wire bytes into numeric values:
//! - Unsigned accumulation of 1..=8 bytes with two's complement correction
//! - IEEE 754 float32/float64
//! - BCD (two decimal digits per byte)
//! - Decimal point shifting and scale factor multiplication

use super::ByteOrder;

// ============================================================================
// Byte Reordering
// ============================================================================

/// Reorder wire bytes into big-endian (most significant byte first) order
///
/// Word-swapped orders need an even number of bytes; `None` otherwise.
pub fn to_big_endian(bytes: &[u8], order: ByteOrder) -> Option<Vec<u8>> {
    match order {
        ByteOrder::BigEndian => Some(bytes.to_vec()),
        ByteOrder::LittleEndian => Some(bytes.iter().rev().copied().collect()),
        ByteOrder::BigEndianSwap => {
            if bytes.len() % 2 != 0 {
                return None;
            }
            // CDAB: word order reversed, bytes inside each word untouched
            Some(bytes.chunks(2).rev().flatten().copied().collect())
        },
        ByteOrder::LittleEndianSwap => {
            if bytes.len() % 2 != 0 {
                return None;
            }
            // BADC: word order kept, bytes inside each word swapped
            Some(bytes.chunks(2).flat_map(|w| [w[1], w[0]]).collect())
        },
    }
}

/// Reverse the order of the 16-bit words in place (low-word-first registers)
///
/// `[C, D, A, B]` becomes `[A, B, C, D]`. A trailing odd byte is left alone.
pub fn swap_words(bytes: &mut [u8]) {
    let words = bytes.len() / 2;
    for i in 0..words / 2 {
        let j = words - 1 - i;
        bytes.swap(2 * i, 2 * j);
        bytes.swap(2 * i + 1, 2 * j + 1);
    }
}

// ============================================================================
// Integer Conversions
// ============================================================================

/// Accumulate up to 8 bytes into an unsigned value using the given byte order
pub fn bytes_to_u64(bytes: &[u8], order: ByteOrder) -> Option<u64> {
    if bytes.is_empty() || bytes.len() > 8 {
        return None;
    }
    let ordered = to_big_endian(bytes, order)?;
    Some(
        ordered
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
    )
}

/// Two's complement correction of a raw value that is `bits` wide
pub fn sign_extend(raw: u64, bits: u32) -> i64 {
    if bits == 0 || bits >= 64 {
        return raw as i64;
    }
    let sign_bit = 1u64 << (bits - 1);
    if raw & sign_bit != 0 {
        let mask = !((1u64 << bits) - 1);
        (raw | mask) as i64
    } else {
        raw as i64
    }
}

/// Decode an integer field: unsigned accumulation, then optional sign correction
/// based on the field bit width
pub fn bytes_to_integer(bytes: &[u8], order: ByteOrder, signed: bool) -> Option<f64> {
    let raw = bytes_to_u64(bytes, order)?;
    if signed {
        Some(sign_extend(raw, bytes.len() as u32 * 8) as f64)
    } else {
        Some(raw as f64)
    }
}

// ============================================================================
// Floating Point Conversions
// ============================================================================

/// Convert 4 bytes to f32 with specified byte order
pub fn bytes_to_f32(bytes: &[u8], order: ByteOrder) -> Option<f32> {
    let ordered: [u8; 4] = to_big_endian(bytes, order)?.try_into().ok()?;
    Some(f32::from_be_bytes(ordered))
}

/// Convert 8 bytes to f64 with specified byte order
pub fn bytes_to_f64(bytes: &[u8], order: ByteOrder) -> Option<f64> {
    let ordered: [u8; 8] = to_big_endian(bytes, order)?.try_into().ok()?;
    Some(f64::from_be_bytes(ordered))
}

// ============================================================================
// BCD Conversions
// ============================================================================

/// Convert BCD-encoded bytes to an integer
///
/// Each byte carries two decimal digits: `value = value * 100 + hi * 10 + lo`.
/// Nibbles above 9 are folded in arithmetically rather than rejected, matching
/// how indicator firmware packs over-range displays. `None` on overflow.
pub fn bcd_to_u64(bytes: &[u8]) -> Option<u64> {
    let mut result = 0u64;
    for byte in bytes {
        let high = u64::from((byte >> 4) & 0x0F);
        let low = u64::from(byte & 0x0F);
        result = result.checked_mul(100)?.checked_add(high * 10 + low)?;
    }
    Some(result)
}

// ============================================================================
// Decimal Shift and Scaling
// ============================================================================

/// Move the decimal point `places` digits to the left (1240, 2 → 12.40)
///
/// Division by an exact power of ten keeps results such as 12.4 identical to
/// the literal `12.4`.
pub fn apply_decimal_places(value: f64, places: u32) -> f64 {
    if places == 0 {
        return value;
    }
    value / 10f64.powi(places.min(308) as i32)
}

/// Multiply by the configured scale factor (1.0 leaves the value untouched)
pub fn apply_scale(value: f64, scale_factor: f64) -> f64 {
    if scale_factor == 1.0 {
        value
    } else {
        value * scale_factor
    }
}

/// Decimal shift followed by scaling, the order every format applies them in
pub fn shift_and_scale(value: f64, places: u32, scale_factor: f64) -> f64 {
    apply_scale(apply_decimal_places(value, places), scale_factor)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_to_big_endian_all_orders() {
        let wire = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(
            to_big_endian(&wire, ByteOrder::BigEndian).unwrap(),
            vec![0x12, 0x34, 0x56, 0x78]
        );
        assert_eq!(
            to_big_endian(&[0x78, 0x56, 0x34, 0x12], ByteOrder::LittleEndian).unwrap(),
            wire.to_vec()
        );
        assert_eq!(
            to_big_endian(&[0x56, 0x78, 0x12, 0x34], ByteOrder::BigEndianSwap).unwrap(),
            wire.to_vec()
        );
        assert_eq!(
            to_big_endian(&[0x34, 0x12, 0x78, 0x56], ByteOrder::LittleEndianSwap).unwrap(),
            wire.to_vec()
        );
        assert!(to_big_endian(&[1, 2, 3], ByteOrder::BigEndianSwap).is_none());
    }

    #[test]
    fn test_swap_words() {
        let mut four = [0xC0, 0xD0, 0xA0, 0xB0];
        swap_words(&mut four);
        assert_eq!(four, [0xA0, 0xB0, 0xC0, 0xD0]);

        let mut eight = [7, 8, 5, 6, 3, 4, 1, 2];
        swap_words(&mut eight);
        assert_eq!(eight, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_bytes_to_u64() {
        assert_eq!(
            bytes_to_u64(&[0x00, 0x00, 0x04, 0xD2], ByteOrder::BigEndian),
            Some(1234)
        );
        assert_eq!(
            bytes_to_u64(&[0xD2, 0x04, 0x00, 0x00], ByteOrder::LittleEndian),
            Some(1234)
        );
        assert_eq!(bytes_to_u64(&[], ByteOrder::BigEndian), None);
        assert_eq!(bytes_to_u64(&[0; 9], ByteOrder::BigEndian), None);
    }

    #[test]
    fn test_signed_correction_uses_field_width() {
        assert_eq!(
            bytes_to_integer(&[0xFF, 0xFE], ByteOrder::BigEndian, true),
            Some(-2.0)
        );
        assert_eq!(
            bytes_to_integer(&[0xFF, 0xFE], ByteOrder::BigEndian, false),
            Some(65534.0)
        );
        assert_eq!(
            bytes_to_integer(&[0x80], ByteOrder::BigEndian, true),
            Some(-128.0)
        );
        assert_eq!(sign_extend(0x7FFF, 16), 32767);
    }

    #[test]
    fn test_floats() {
        // 25.0 in IEEE 754: 0x41C80000
        let v = bytes_to_f32(&[0x41, 0xC8, 0x00, 0x00], ByteOrder::BigEndian).unwrap();
        assert!((v - 25.0).abs() < f32::EPSILON);
        let v = bytes_to_f32(&[0x00, 0x00, 0xC8, 0x41], ByteOrder::LittleEndian).unwrap();
        assert!((v - 25.0).abs() < f32::EPSILON);
        assert!(bytes_to_f32(&[0x41, 0xC8], ByteOrder::BigEndian).is_none());

        let bytes = 12.5f64.to_be_bytes();
        assert_eq!(bytes_to_f64(&bytes, ByteOrder::BigEndian), Some(12.5));
    }

    #[test]
    fn test_bcd() {
        assert_eq!(bcd_to_u64(&[0x12, 0x34]), Some(1234));
        assert_eq!(bcd_to_u64(&[0x00, 0x01, 0x24, 0x00]), Some(12400));
        assert_eq!(bcd_to_u64(&[]), Some(0));
        assert_eq!(bcd_to_u64(&[0x99; 10]), None);
    }

    #[test]
    fn test_decimal_shift_and_scale() {
        assert_eq!(apply_decimal_places(1240.0, 2), 12.4);
        assert_eq!(apply_decimal_places(1234.0, 2), 12.34);
        assert_eq!(apply_decimal_places(5.0, 0), 5.0);
        assert_eq!(shift_and_scale(1234.0, 1, 2.0), 246.8);
        assert_eq!(apply_scale(3.0, 1.0), 3.0);
    }
}
