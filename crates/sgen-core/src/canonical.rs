//! # Canonical Serialization — JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in digest computation across sgen.
//!
//! ## Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through [`CanonicalBytes::new()`] or
//! [`CanonicalBytes::from_value()`], both of which route through RFC 8785
//! (JSON Canonicalization Scheme) serialization:
//!
//! 1. **Sorted keys**: object members ordered by UTF-16 code units, at every
//!    nesting depth.
//! 2. **Compact separators**: no insignificant whitespace.
//! 3. **Arrays keep order**: element order is semantic in JSON Schema
//!    (`enum`, `prefixItems`, `required` lists as written).
//! 4. **ECMAScript number form**: `1.0` and `1` serialize identically, so
//!    numerically equal constraints (`"minimum": 1.0` vs `"minimum": 1`) do
//!    not split the cache.
//!
//! Two schema texts that differ only in key order, indentation or
//! insignificant whitespace therefore produce identical canonical bytes,
//! which is what makes the cache key content-addressed rather than
//! text-addressed.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructors are `CanonicalBytes::new()` and `CanonicalBytes::from_value()`.
/// - Serialization uses sorted keys with compact separators (RFC 8785).
/// - The bytes are valid UTF-8 and valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(&value)
    }

    /// Construct canonical bytes from an already-parsed JSON value.
    ///
    /// This is the hot path for schema documents, which are parsed once at
    /// ingestion and never re-serialized through `Serialize`.
    pub fn from_value(value: &Value) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_simple_dict() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn test_canonical_bytes_nested() {
        let data = serde_json::json!({
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
            "required": ["name", "age"]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        // Nested objects are sorted; arrays keep their order.
        assert_eq!(
            s,
            r#"{"properties":{"age":{"type":"integer"},"name":{"type":"string"}},"required":["name","age"]}"#
        );
    }

    #[test]
    fn test_whitespace_and_key_order_independent() {
        let a: Value = serde_json::from_str(
            "{\n  \"type\": \"object\",\n  \"properties\": {\"x\": {\"type\": \"string\"}}\n}",
        )
        .unwrap();
        let b: Value =
            serde_json::from_str(r#"{"properties":{"x":{"type":"string"}},"type":"object"}"#)
                .unwrap();
        assert_eq!(
            CanonicalBytes::from_value(&a).unwrap(),
            CanonicalBytes::from_value(&b).unwrap()
        );
    }

    #[test]
    fn test_float_accepted() {
        let data = serde_json::json!({"minimum": 0.5});
        let cb = CanonicalBytes::new(&data).expect("floats are legal schema constraints");
        assert_eq!(cb.as_bytes(), br#"{"minimum":0.5}"#);
    }

    #[test]
    fn test_integral_float_matches_integer() {
        let a: Value = serde_json::from_str(r#"{"minimum": 1.0}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"minimum": 1}"#).unwrap();
        assert_eq!(
            CanonicalBytes::from_value(&a).unwrap(),
            CanonicalBytes::from_value(&b).unwrap()
        );
    }

    #[test]
    fn test_array_order_is_significant() {
        let a = CanonicalBytes::new(&serde_json::json!({"enum": ["a", "b"]})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"enum": ["b", "a"]})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_boolean_schema() {
        let cb = CanonicalBytes::new(&true).unwrap();
        assert_eq!(cb.as_bytes(), b"true");
    }

    #[test]
    fn test_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), 2);
    }

    #[test]
    fn test_unicode_passthrough() {
        let data = serde_json::json!({"title": "\u{00e9}t\u{00e9}"});
        let cb = CanonicalBytes::new(&data).expect("unicode should pass through");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert!(s.contains('\u{00e9}'));
    }
}
