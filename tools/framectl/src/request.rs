//! `framectl request`

use anyhow::{bail, Result};
use colored::*;
use scale_codec::modbus::{build_read_request, is_register_read};
use scale_common::hex::{encode_spaced, encode_upper};
use serde::Serialize;

use crate::settings::{OutputFormat, Settings};

fn parse_number(text: &str) -> std::result::Result<u64, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", text, e))
}

/// Accepts decimal or `0x` prefixed hex
pub fn parse_u8(text: &str) -> std::result::Result<u8, String> {
    let value = parse_number(text)?;
    u8::try_from(value).map_err(|_| format!("{} does not fit in one byte", value))
}

pub fn parse_u16(text: &str) -> std::result::Result<u16, String> {
    let value = parse_number(text)?;
    u16::try_from(value).map_err(|_| format!("{} does not fit in 16 bits", value))
}

#[derive(Debug, Serialize)]
struct RequestOutput {
    slave_id: u8,
    function_code: u8,
    start: u16,
    count: u16,
    frame: String,
}

pub fn run(settings: &Settings, slave: u8, function: u8, start: u16, count: u16) -> Result<bool> {
    if !is_register_read(function) {
        bail!(
            "function 0x{:02X} is not a register read (use 0x03 or 0x04)",
            function
        );
    }
    if count == 0 || count > 125 {
        bail!("register count must be between 1 and 125, got {}", count);
    }

    let frame = build_read_request(slave, function, start, count);

    match settings.output {
        OutputFormat::Json => {
            let output = RequestOutput {
                slave_id: slave,
                function_code: function,
                start,
                count,
                frame: encode_upper(&frame),
            };
            println!("{}", serde_json::to_string(&output)?);
        },
        OutputFormat::Text => {
            println!(
                "{} slave {} function 0x{:02X} registers {}..{}",
                "Request:".bold(),
                slave,
                function,
                start,
                u32::from(start) + u32::from(count)
            );
            println!("{}", encode_spaced(&frame).cyan());
        },
    }
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_u8("3"), Ok(3));
        assert_eq!(parse_u8("0x04"), Ok(4));
        assert_eq!(parse_u16("0X1F40"), Ok(8000));
        assert!(parse_u8("256").is_err());
        assert!(parse_u16("-1").is_err());
        assert!(parse_u8("0xGG").is_err());
    }

    #[test]
    fn test_run_validates_arguments() {
        let settings = Settings::default();
        assert!(run(&settings, 1, 0x03, 0, 4).unwrap());
        assert!(run(&settings, 1, 0x06, 0, 4).is_err());
        assert!(run(&settings, 1, 0x03, 0, 0).is_err());
        assert!(run(&settings, 1, 0x04, 0, 126).is_err());
    }
}
