//! Value Codec Module
//!
//! Turns application values into the bytes the key-value store carries.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Serializes arbitrary application values to and from store bytes.
pub trait ValueCodec: Send + Sync {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// JSON codec backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        id: u64,
        tags: Vec<String>,
        scores: HashMap<String, f64>,
    }

    #[test]
    fn test_json_codec_structured_value() {
        let mut scores = HashMap::new();
        scores.insert("a".to_string(), 1.5);
        let profile = Profile {
            id: 7,
            tags: vec!["x".to_string(), "y".to_string()],
            scores,
        };

        let bytes = JsonCodec.serialize(&profile).unwrap();
        let decoded: Profile = JsonCodec.deserialize(&bytes).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn test_json_codec_rejects_garbage() {
        let result: Result<Profile> = JsonCodec.deserialize(b"\x00\x01garbage");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[test]
    fn test_json_codec_type_mismatch() {
        let bytes = JsonCodec.serialize(&"text").unwrap();
        let result: Result<u32> = JsonCodec.deserialize(&bytes);
        assert!(result.is_err());
    }
}
