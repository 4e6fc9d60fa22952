//! Text field helpers shared by the ASCII decoders

use crate::bytes::shift_and_scale;
use crate::config::{FieldDefinition, FieldRole};
use crate::error::{DecodeError, Result};

/// Printable ASCII plus tab, CR and LF
pub(crate) fn is_frame_byte(b: u8) -> bool {
    matches!(b, b'\t' | b'\r' | b'\n' | 0x20..=0x7E)
}

/// Parse a decimal number after dropping every character that is not a digit
/// or dot (and minus, when `keep_minus` is set)
pub(crate) fn parse_decimal(role: &FieldRole, text: &str, keep_minus: bool) -> Result<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || (keep_minus && *c == '-'))
        .collect();

    if cleaned.is_empty() {
        return Err(DecodeError::invalid_number(role.as_str(), text.trim()));
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| DecodeError::invalid_number(role.as_str(), text.trim()))
}

/// Numeric text field with decimal shift and scale applied
///
/// Digit runs too long for `f64` parse to infinity; those are rejected rather
/// than reported as a reading.
pub(crate) fn decode_measure(field: &FieldDefinition, text: &str, keep_minus: bool) -> Result<f64> {
    let raw = parse_decimal(&field.role, text, keep_minus)?;
    let value = shift_and_scale(raw, field.decimal_places, field.scale_factor);
    if !value.is_finite() {
        return Err(DecodeError::parse(format!(
            "{} value '{}...' is out of range",
            field.role,
            text.trim().chars().take(16).collect::<String>()
        )));
    }
    Ok(value)
}

/// Stability keywords; `Y`/`YES` are accepted by delimited frames only
pub(crate) fn is_stable_token(text: &str, accept_yes: bool) -> bool {
    let upper = text.trim().to_ascii_uppercase();
    match upper.as_str() {
        "S" | "1" | "STABLE" | "TRUE" => true,
        "Y" | "YES" => accept_yes,
        _ => false,
    }
}

/// Resolve a stability field: the mapping table wins when configured
pub(crate) fn resolve_stable(field: &FieldDefinition, text: &str, accept_yes: bool) -> bool {
    let key = text.trim();
    if field.mapping.is_some() {
        return field
            .map_text(key)
            .is_some_and(|mapped| is_stable_token(mapped, true));
    }
    is_stable_token(key, accept_yes)
}

/// Canonical unit label for common spellings; anything else passes through
pub(crate) fn normalize_unit(text: &str) -> String {
    let trimmed = text.trim();
    let canonical = match trimmed.to_ascii_lowercase().as_str() {
        "kg" | "kgs" | "kilogram" | "kilograms" => "kg",
        "g" | "gram" | "grams" => "g",
        "lb" | "lbs" | "pound" | "pounds" => "lb",
        "oz" | "ounce" | "ounces" => "oz",
        "t" | "ton" | "tons" => "t",
        _ => return trimmed.to_string(),
    };
    canonical.to_string()
}
