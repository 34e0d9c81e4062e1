//! Cache Entry Module
//!
//! Wire format of a stored entry: a JSON object `{"v": <value>, "exp": <ms>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// == Entry Error ==
/// Reasons a stored entry is considered corrupted.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("entry is not an object")]
    NotAnObject,

    #[error("missing or non-numeric expiry")]
    BadExpiry,

    #[error("missing value")]
    MissingValue,
}

// == Cache Entry ==
/// A value paired with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The stored value
    #[serde(rename = "v")]
    pub value: T,
    /// Expiration timestamp (Unix milliseconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry expiring `ttl_ms` after `now_ms`.
    ///
    /// A negative TTL yields an entry that is already expired.
    pub fn new(value: T, now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            value,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` is strictly past its expiry, so a zero
    /// TTL entry is still readable within the same millisecond.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }
}

impl CacheEntry<Value> {
    // == Parse ==
    /// Decodes a stored entry without interpreting its payload.
    ///
    /// Fails if the text is not JSON, `exp` is not a number, or `v` is
    /// absent or `null`.
    pub fn parse(raw: &str) -> Result<Self, EntryError> {
        let mut object = match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => map,
            _ => return Err(EntryError::NotAnObject),
        };

        let expires_at = object
            .get("exp")
            .and_then(number_as_millis)
            .ok_or(EntryError::BadExpiry)?;

        match object.remove("v") {
            None | Some(Value::Null) => Err(EntryError::MissingValue),
            Some(value) => Ok(Self { value, expires_at }),
        }
    }

    /// Encodes the entry in its stored form.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Accepts integral and finite fractional JSON numbers.
fn number_as_millis(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number
        .as_i64()
        .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", 1_000, 60_000);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.expires_at, 61_000);
        assert!(!entry.is_expired_at(1_000));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", 1_000, 0);

        // Same millisecond is still valid, one past is expired
        assert!(!entry.is_expired_at(1_000));
        assert!(entry.is_expired_at(1_001));
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let entry = CacheEntry::new("test", 1_000, -5);
        assert!(entry.is_expired_at(1_000));
    }

    #[test]
    fn test_encode_uses_short_field_names() {
        let entry = CacheEntry::new(json!({"name": "bulbasaur"}), 0, 5);
        let raw = entry.encode().unwrap();

        assert_eq!(raw, r#"{"v":{"name":"bulbasaur"},"exp":5}"#);
        assert_eq!(CacheEntry::parse(&raw).unwrap(), entry);
    }

    #[test]
    fn test_parse_accepts_fractional_expiry() {
        let entry = CacheEntry::parse(r#"{"v":1,"exp":1700.9}"#).unwrap();
        assert_eq!(entry.expires_at, 1700);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            CacheEntry::parse("{not json"),
            Err(EntryError::InvalidJson(_))
        ));
        assert!(matches!(
            CacheEntry::parse("[1,2]"),
            Err(EntryError::NotAnObject)
        ));
        assert!(matches!(
            CacheEntry::parse(r#"{"v":1,"exp":"soon"}"#),
            Err(EntryError::BadExpiry)
        ));
        assert!(matches!(
            CacheEntry::parse(r#"{"v":1}"#),
            Err(EntryError::BadExpiry)
        ));
        assert!(matches!(
            CacheEntry::parse(r#"{"exp":10}"#),
            Err(EntryError::MissingValue)
        ));
        assert!(matches!(
            CacheEntry::parse(r#"{"v":null,"exp":10}"#),
            Err(EntryError::MissingValue)
        ));
    }
}
