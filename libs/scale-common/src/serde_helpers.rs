//! Shared Serde helpers for device profile documents

use serde::{Deserialize, Deserializer, Serializer};

// ============================================================================
// Default Value Functions (for serde #[serde(default = "...")] attributes)
// ============================================================================

/// Default value: true
pub fn bool_true() -> bool {
    true
}

/// Default scale factor: 1.0
pub fn scale_one() -> f64 {
    1.0
}

// ============================================================================
// Custom Deserializers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexBool {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Booleans written as `true`, `1`, `"yes"`, `"on"` and friends
///
/// Profile documents are often hand edited or exported from vendor tools that
/// spell flags differently. An empty string reads as `false`.
pub fn deserialize_bool_flexible<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let parsed = match FlexBool::deserialize(deserializer)? {
        FlexBool::Bool(b) => Some(b),
        FlexBool::Int(0) => Some(false),
        FlexBool::Int(1) => Some(true),
        FlexBool::Int(_) => None,
        FlexBool::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "" | "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
    };
    parsed.ok_or_else(|| D::Error::custom("expected a boolean (true/false, 1/0, yes/no, on/off)"))
}

/// Custom deserializer for f64 scale factors: a zero or missing value means 1.0
pub fn deserialize_scale<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v != 0.0 => v,
        _ => 1.0,
    })
}

/// Optional byte sequences written as hex text (`"AA 55"`, `"0x02"`) or as a
/// list of integers (`[170, 85]`).
///
/// ```ignore
/// #[derive(Deserialize, Serialize)]
/// struct Frame {
///     #[serde(default, with = "scale_common::serde_helpers::hex_bytes_opt")]
///     header: Option<Vec<u8>>,
/// }
/// ```
pub mod hex_bytes_opt {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HexOrList {
        Hex(String),
        List(Vec<u8>),
    }

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&crate::hex::encode_spaced(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Option::<HexOrList>::deserialize(deserializer)? {
            None => Ok(None),
            Some(HexOrList::Hex(s)) if s.trim().is_empty() => Ok(None),
            Some(HexOrList::Hex(s)) => crate::hex::decode_flexible(&s)
                .map(Some)
                .map_err(D::Error::custom),
            Some(HexOrList::List(bytes)) if bytes.is_empty() => Ok(None),
            Some(HexOrList::List(bytes)) => Ok(Some(bytes)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // unwrap is acceptable in tests
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Deserialize, Serialize)]
    struct Marker {
        #[serde(default, with = "hex_bytes_opt")]
        header: Option<Vec<u8>>,
    }

    #[derive(Deserialize)]
    struct Flags {
        #[serde(deserialize_with = "deserialize_bool_flexible")]
        signed: bool,
        #[serde(default = "scale_one", deserialize_with = "deserialize_scale")]
        scale: f64,
    }

    #[test]
    fn test_hex_bytes_from_string() {
        let m: Marker = serde_json::from_str(r#"{"header": "AA 55"}"#).unwrap();
        assert_eq!(m.header, Some(vec![0xAA, 0x55]));
    }

    #[test]
    fn test_hex_bytes_from_list() {
        let m: Marker = serde_json::from_str(r#"{"header": [2, 3]}"#).unwrap();
        assert_eq!(m.header, Some(vec![0x02, 0x03]));
    }

    #[test]
    fn test_hex_bytes_missing_and_empty() {
        let m: Marker = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(m.header, None);
        let m: Marker = serde_json::from_str(r#"{"header": ""}"#).unwrap();
        assert_eq!(m.header, None);
    }

    #[test]
    fn test_hex_bytes_serialize() {
        let m = Marker {
            header: Some(vec![0x02, 0xFF]),
        };
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"header":"02 FF"}"#);
    }

    #[test]
    fn test_hex_bytes_invalid() {
        let result: Result<Marker, _> = serde_json::from_str(r#"{"header": "GG"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_flexible_bool_and_scale() {
        let f: Flags = serde_json::from_str(r#"{"signed": "yes", "scale": 0}"#).unwrap();
        assert!(f.signed);
        assert_eq!(f.scale, 1.0);

        let f: Flags = serde_json::from_str(r#"{"signed": 0, "scale": 0.5}"#).unwrap();
        assert!(!f.signed);
        assert_eq!(f.scale, 0.5);

        let f: Flags = serde_json::from_str(r#"{"signed": " OFF "}"#).unwrap();
        assert!(!f.signed);
        assert_eq!(f.scale, 1.0);

        assert!(serde_json::from_str::<Flags>(r#"{"signed": 2}"#).is_err());
        assert!(serde_json::from_str::<Flags>(r#"{"signed": "maybe"}"#).is_err());
    }
}
