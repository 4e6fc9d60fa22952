//! `framectl convert`

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use scale_codec::DeviceProfile;

use crate::settings::Settings;

pub fn run(settings: &Settings, input: &Path, output: &Path) -> Result<bool> {
    let input = settings.resolve_profile(input);
    let profile = DeviceProfile::load(&input)
        .with_context(|| format!("Failed to load profile {}", input.display()))?;
    profile
        .save(output)
        .with_context(|| format!("Failed to write profile {}", output.display()))?;

    println!(
        "{} {} -> {}",
        "✓".green(),
        input.display(),
        output.display()
    );
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use scale_codec::{FieldRole, FrameType};
    use tempfile::TempDir;

    #[test]
    fn test_convert_normalizes_aliases() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("legacy.yaml");
        std::fs::write(
            &input,
            "model: legacy\nframe:\n  frame_type: HEX\n  header: \"AA 55\"\n  fields:\n    - { name: weight, offset: 2, length: 4 }\n    - { role: status, offset: 6, length: 1 }\n",
        )
        .unwrap();
        let output = dir.path().join("legacy.json");

        assert!(run(&Settings::default(), &input, &output).unwrap());

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("HEX_FIXED"));
        let profile = DeviceProfile::load(&output).unwrap();
        assert_eq!(profile.frame.frame_type, FrameType::HexFixed);
        assert_eq!(profile.frame.header, Some(vec![0xAA, 0x55]));
        assert_eq!(profile.frame.fields[1].role, FieldRole::Stable);
    }

    #[test]
    fn test_unsupported_output_extension() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("p.yaml");
        std::fs::write(
            &input,
            "model: p\nframe:\n  frame_type: ASCII_VARIABLE\n  fields:\n    - { role: weight, index: 0 }\n",
        )
        .unwrap();
        assert!(run(&Settings::default(), &input, &dir.path().join("p.ini")).is_err());
    }
}
