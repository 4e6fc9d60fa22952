//! `framectl decode`

use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::*;
use scale_codec::{DeviceProfile, ParseResult};
use scale_common::hex::{decode_flexible, encode_spaced};
use tracing::debug;

use crate::settings::{OutputFormat, Settings};

/// Frame bytes as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameInput {
    Hex(String),
    Text(String),
}

impl FrameInput {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            FrameInput::Hex(text) => Ok(decode_flexible(text)?),
            FrameInput::Text(text) => unescape(text),
        }
    }
}

/// Expand `\r`, `\n`, `\t`, `\0`, `\\` and `\xNN` escapes into raw bytes
pub fn unescape(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('r') => out.push(b'\r'),
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('0') => out.push(0x00),
            Some('\\') => out.push(b'\\'),
            Some('x') => {
                let digits: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&digits, 16)
                    .ok()
                    .filter(|_| digits.len() == 2)
                    .with_context(|| format!("Invalid escape '\\x{}'", digits))?;
                out.push(byte);
            },
            Some(other) => bail!("Unknown escape '\\{}'", other),
            None => bail!("Trailing backslash in frame text"),
        }
    }
    Ok(out)
}

pub fn run(settings: &Settings, profile: &Path, input: &FrameInput) -> Result<bool> {
    let path = settings.resolve_profile(profile);
    let profile = DeviceProfile::load(&path)
        .with_context(|| format!("Failed to load profile {}", path.display()))?;
    let frame = input.to_bytes()?;
    debug!(model = %profile.model, len = frame.len(), "Decoding frame");

    let result = scale_codec::decode(&profile.frame, &frame);

    match settings.output {
        OutputFormat::Json => println!("{}", result.to_json()?),
        OutputFormat::Text => print_result(&profile, &frame, &result),
    }
    Ok(result.is_success())
}

fn print_result(profile: &DeviceProfile, frame: &[u8], result: &ParseResult) {
    println!(
        "{} {} ({})",
        "Profile:".bold(),
        profile.model,
        profile.frame.frame_type
    );
    println!("{} [{}]", "Frame:".bold(), encode_spaced(frame));
    println!();

    if let Some(weight) = result.weight() {
        println!("  weight   {} {}", weight, result.unit().unwrap_or_default());
    }
    let measures = [
        ("tare", result.tare_weight()),
        ("gross", result.gross_weight()),
        ("net", result.net_weight()),
    ];
    for (label, value) in measures {
        if let Some(value) = value {
            println!("  {:<8} {}", label, value);
        }
    }
    if let Some(stable) = result.is_stable() {
        let text = if stable { "stable".green() } else { "in motion".yellow() };
        println!("  status   {}", text);
    }
    if let Some(valid) = result.checksum_valid() {
        let text = if valid { "ok".green() } else { "mismatch".red() };
        println!("  checksum {}", text);
    }
    println!();

    match (result.error_code(), result.error_message()) {
        (None, _) => println!("{} decoded {} bytes", "✓".green(), result.frame_length()),
        (Some(code), message) => println!(
            "{} {}: {}",
            "✗".red(),
            code.to_string().red().bold(),
            message.unwrap_or_default()
        ),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_unescape_control_characters() {
        assert_eq!(unescape("+001240 kg S\\r\\n").unwrap(), b"+001240 kg S\r\n");
        assert_eq!(unescape("a\\tb\\\\c").unwrap(), b"a\tb\\c");
        assert_eq!(unescape("\\x02W\\x03").unwrap(), vec![0x02, b'W', 0x03]);
    }

    #[test]
    fn test_unescape_rejects_bad_escapes() {
        assert!(unescape("\\q").is_err());
        assert!(unescape("abc\\").is_err());
        assert!(unescape("\\x4").is_err());
        assert!(unescape("\\xZZ").is_err());
    }

    #[test]
    fn test_hex_input() {
        let input = FrameInput::Hex("AA 55 0x01".to_string());
        assert_eq!(input.to_bytes().unwrap(), vec![0xAA, 0x55, 0x01]);
        assert!(FrameInput::Hex("AA 5".to_string()).to_bytes().is_err());
    }

    #[test]
    fn test_run_reports_success_and_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("indicator.yaml");
        std::fs::write(
            &path,
            r#"
model: test-indicator
frame:
  frame_type: ASCII_FIXED
  min_length: 12
  fields:
    - { role: sign, offset: 0, length: 1 }
    - { role: weight, offset: 1, length: 6, decimal_places: 2 }
    - { role: unit, offset: 8, length: 2 }
"#,
        )
        .unwrap();

        let settings = Settings {
            output: OutputFormat::Json,
            ..Settings::default()
        };
        let good = FrameInput::Text("+001240 kg S\\r\\n".to_string());
        assert!(run(&settings, &path, &good).unwrap());

        let short = FrameInput::Text("+0012".to_string());
        assert!(!run(&settings, &path, &short).unwrap());

        assert!(run(&settings, &dir.path().join("missing.yaml"), &good).is_err());
    }
}
