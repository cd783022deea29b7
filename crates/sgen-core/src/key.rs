//! # Cache Key Derivation
//!
//! A `CacheKey` is the SHA-256 of the JCS canonical form of
//!
//! ```json
//! {"options": {"style": {...}, "targetLanguage": "..."}, "schema": <parsed>, "schemaId": "..."}
//! ```
//!
//! The document id is part of the material: emitters name the root type and
//! the file header after it, so two ids with the same body produce different
//! source text and must not share an entry.
//!
//! Because everything passes through [`CanonicalBytes`], object-key order and
//! whitespace in the uploaded schema never reach the hash, and options are
//! already normalized by [`GenerationOptions`] (aliases resolved, defaults
//! dropped) before they are keyed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::{CanonicalizationError, KeyParseError};
use crate::options::GenerationOptions;

/// Content-addressed fingerprint of a (document, options) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(ContentDigest);

impl CacheKey {
    /// Derive the key for document `schema_id` with parsed `schema` under
    /// the given options.
    ///
    /// Pure: no I/O, no clock, no randomness.
    pub fn derive(
        schema_id: &str,
        schema: &Value,
        options: &GenerationOptions,
    ) -> Result<Self, CanonicalizationError> {
        let material = json!({
            "schemaId": schema_id,
            "schema": schema,
            "options": {
                "targetLanguage": options.target_language(),
                "style": options.style().as_map(),
            },
        });
        let canonical = CanonicalBytes::from_value(&material)?;
        Ok(Self(sha256_digest(&canonical)))
    }

    /// The underlying digest.
    pub fn digest(&self) -> &ContentDigest {
        &self.0
    }

    /// Lowercase 64-char hex form, used for store paths and on the wire.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for CacheKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("sha256:").unwrap_or(s);
        if s.len() != 64 {
            return Err(KeyParseError::Length(s.chars().count()));
        }
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(KeyParseError::NonHex(bad));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hi = hex_val(chunk[0]);
            let lo = hex_val(chunk[1]);
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Self(ContentDigest::from_bytes(bytes)))
    }
}

fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

impl Serialize for CacheKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CacheKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn go() -> GenerationOptions {
        GenerationOptions::for_language("go").unwrap()
    }

    #[test]
    fn key_ignores_key_order_and_whitespace() {
        let a: Value = serde_json::from_str(
            r#"{ "type": "object",
                 "properties": { "name": { "type": "string" } } }"#,
        )
        .unwrap();
        let b: Value =
            serde_json::from_str(r#"{"properties":{"name":{"type":"string"}},"type":"object"}"#)
                .unwrap();
        assert_eq!(
            CacheKey::derive("person", &a, &go()).unwrap(),
            CacheKey::derive("person", &b, &go()).unwrap()
        );
    }

    #[test]
    fn key_depends_on_language() {
        let schema = json!({"type": "string"});
        let ts = GenerationOptions::for_language("typescript").unwrap();
        assert_ne!(
            CacheKey::derive("label", &schema, &go()).unwrap(),
            CacheKey::derive("label", &schema, &ts).unwrap()
        );
    }

    #[test]
    fn key_depends_on_style() {
        let schema = json!({"type": "string"});
        let mut style = BTreeMap::new();
        style.insert("justTypes".to_string(), json!(true));
        let just = GenerationOptions::new("go", style).unwrap();
        assert_ne!(
            CacheKey::derive("label", &schema, &go()).unwrap(),
            CacheKey::derive("label", &schema, &just).unwrap()
        );
    }

    #[test]
    fn default_style_shares_key_with_empty_style() {
        let schema = json!({"type": "string"});
        let mut style = BTreeMap::new();
        style.insert("acronymStyle".to_string(), json!("pascal"));
        let explicit = GenerationOptions::new("golang", style).unwrap();
        assert_eq!(
            CacheKey::derive("label", &schema, &go()).unwrap(),
            CacheKey::derive("label", &schema, &explicit).unwrap()
        );
    }

    #[test]
    fn key_depends_on_schema_id() {
        let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
        assert_ne!(
            CacheKey::derive("user", &schema, &go()).unwrap(),
            CacheKey::derive("customer", &schema, &go()).unwrap()
        );
    }

    #[test]
    fn hex_round_trip() {
        let key = CacheKey::derive("a", &json!({"a": 1}), &go()).unwrap();
        let parsed: CacheKey = key.to_hex().parse().unwrap();
        assert_eq!(parsed, key);
        let prefixed: CacheKey = format!("sha256:{}", key.to_hex()).parse().unwrap();
        assert_eq!(prefixed, key);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!("abc".parse::<CacheKey>().unwrap_err(), KeyParseError::Length(3));
        let bad = "z".repeat(64);
        assert_eq!(bad.parse::<CacheKey>().unwrap_err(), KeyParseError::NonHex('z'));
    }

    #[test]
    fn serde_as_string() {
        let key = CacheKey::derive("t", &json!(true), &go()).unwrap();
        let v = serde_json::to_value(key).unwrap();
        assert_eq!(v, Value::String(key.to_hex()));
        let back: CacheKey = serde_json::from_value(v).unwrap();
        assert_eq!(back, key);
    }
}
