//! Identifier obfuscation
//!
//! Internal identifiers are sequential `i64` primary keys. Whenever one
//! crosses the service boundary it is encoded into an opaque string with a
//! per-deployment salt, and decoded on the way back in. Zero is reserved for
//! "absent" and is represented as JSON `null`, never as an encoded string.
//!
//! The codec is built once at startup from [`configs::HashIdConfig`] and
//! shared by reference; it holds no mutable state.

mod json;

use std::fmt;

use harsh::{Harsh, HarshBuilder};
use thiserror::Error;
use tracing::debug;

pub use self::json::{EncodedId, IdSeed};

/// Output alphabet of the codec; hashes never contain anything else.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HashIdError {
    #[error("invalid hashid config: {0}")]
    InvalidConfig(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("decoding error: {0}")]
    Decoding(String),
}

/// Internal identifier. `Id(0)` means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(pub i64);

impl Id {
    pub const NONE: Id = Id(0);

    pub const fn get(self) -> i64 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Id> for i64 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Encode/decode contract for identifier obfuscation. Implementations must
/// be deterministic and bijective for a fixed configuration.
pub trait IdHasher: Send + Sync + 'static {
    fn encode(&self, id: Id) -> Result<String, HashIdError>;
    fn decode(&self, hash: &str) -> Result<Id, HashIdError>;
}

/// Hashids-backed identifier codec accepting only single-value hashes.
#[derive(Debug, Clone)]
pub struct HashId {
    inner: Harsh,
}

impl HashId {
    pub fn new(salt: &str, min_length: usize) -> Result<Self, HashIdError> {
        if salt.is_empty() {
            return Err(HashIdError::InvalidConfig("salt must not be empty".into()));
        }
        let inner = HarshBuilder::new()
            .alphabet(ALPHABET)
            .salt(salt)
            .length(min_length)
            .build()
            .map_err(|e| HashIdError::InvalidConfig(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn from_config(cfg: &configs::HashIdConfig) -> Result<Self, HashIdError> {
        let min_length = cfg
            .min_length
            .ok_or_else(|| HashIdError::InvalidConfig("min_length is required".into()))?;
        let codec = Self::new(&cfg.salt, min_length)?;
        debug!(min_length, "identifier codec ready");
        Ok(codec)
    }

    /// Lossy variant of [`IdHasher::encode`]: failures yield an empty string.
    pub fn encode_string(&self, id: Id) -> String {
        self.encode(id).unwrap_or_default()
    }

    /// JSON scalar form: `null` for zero, the encoded string otherwise.
    pub fn to_json(&self, id: Id) -> Result<serde_json::Value, HashIdError> {
        if id.is_none() {
            return Ok(serde_json::Value::Null);
        }
        self.encode(id).map(serde_json::Value::String)
    }

    /// Serialized JSON text for a single identifier, e.g. `"3wedgpzLRq"` or `null`.
    pub fn marshal_json(&self, id: Id) -> Result<String, HashIdError> {
        Ok(self.to_json(id)?.to_string())
    }

    /// Inverse of [`HashId::marshal_json`]. Accepts `null` (with surrounding
    /// whitespace), a quoted hash, or an empty input, which all but the last
    /// decode through [`IdHasher::decode`].
    pub fn unmarshal_json(&self, raw: &[u8]) -> Result<Id, HashIdError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| HashIdError::Decoding(format!("hash is not utf-8: {e}")))?;
        if text.trim() == "null" {
            return Ok(Id::NONE);
        }
        self.decode(strip_quotes(text))
    }

    pub fn encoded(&self, id: Id) -> EncodedId<'_> {
        EncodedId::new(self, id)
    }

    pub fn seed(&self) -> IdSeed<'_> {
        IdSeed::new(self)
    }
}

impl IdHasher for HashId {
    fn encode(&self, id: Id) -> Result<String, HashIdError> {
        if id.get() <= 0 {
            return Err(HashIdError::Encoding(format!(
                "cannot encode non-positive id {id}"
            )));
        }
        Ok(self.inner.encode(&[id.get().unsigned_abs()]))
    }

    fn decode(&self, hash: &str) -> Result<Id, HashIdError> {
        if hash.is_empty() {
            return Ok(Id::NONE);
        }
        if let Some(bad) = hash.chars().find(|c| !ALPHABET.contains(*c)) {
            return Err(HashIdError::Decoding(format!("invalid character {bad:?} in hash")));
        }
        let values = self
            .inner
            .decode(hash)
            .map_err(|e| HashIdError::Decoding(format!("{hash}: {e}")))?;
        let [value] = values.as_slice() else {
            return Err(HashIdError::Decoding(format!(
                "expected exactly 1 id, decoded {}",
                values.len()
            )));
        };
        i64::try_from(*value).map(Id).map_err(|_| {
            HashIdError::Decoding(format!("decoded value {value} exceeds the id range"))
        })
    }
}

/// Drops one pair of surrounding double quotes, if present.
pub(crate) fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> HashId {
        HashId::new("test", 10).unwrap()
    }

    fn raw(values: &[u64]) -> String {
        HarshBuilder::new().salt("test").length(10).build().unwrap().encode(values)
    }

    #[test]
    fn encodes_known_vector() {
        let h = codec();
        assert_eq!(h.encode(Id(1)).unwrap(), "3wedgpzLRq");
        assert_eq!(h.decode("3wedgpzLRq").unwrap(), Id(1));
        assert_eq!(h.encode(Id(2)).unwrap(), "jNkaAyaZ7Q");
        assert_eq!(h.encode(Id(3)).unwrap(), "k9mWoMdAMD");
    }

    #[test]
    fn encodes_reference_vector_without_padding() {
        let h = HashId::new("this is my salt", 0).unwrap();
        assert_eq!(h.encode(Id(12345)).unwrap(), "NkK9");
        assert_eq!(h.decode("NkK9").unwrap(), Id(12345));
    }

    #[test]
    fn unset_id_hash_decodes_to_zero() {
        assert_eq!(raw(&[0]), "94vz1DdAwM");
        assert_eq!(codec().decode("94vz1DdAwM").unwrap(), Id::NONE);
    }

    #[test]
    fn rejects_tampered_hashes() {
        let h = codec();
        assert!(h.decode("3wedgpzLRr").is_err());
        assert!(h.decode("x").is_err());
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = codec();
        let b = codec();
        assert_eq!(a.encode(Id(42)).unwrap(), a.encode(Id(42)).unwrap());
        assert_eq!(a.encode(Id(42)).unwrap(), b.encode(Id(42)).unwrap());
    }

    #[test]
    fn small_ids_are_not_sequential_and_respect_min_length() {
        let h = codec();
        let encoded: Vec<String> = (1..=3).map(|n| h.encode(Id(n)).unwrap()).collect();
        for (n, s) in encoded.iter().enumerate() {
            assert_ne!(s, &(n + 1).to_string());
            assert!(s.len() >= 10, "{s} shorter than min length");
        }
        assert_ne!(encoded[0], encoded[1]);
        assert_ne!(encoded[1], encoded[2]);
    }

    #[test]
    fn different_salts_give_different_hashes() {
        let a = HashId::new("alpha", 8).unwrap();
        let b = HashId::new("beta", 8).unwrap();
        assert_ne!(a.encode(Id(7)).unwrap(), b.encode(Id(7)).unwrap());
    }

    #[test]
    fn empty_hash_decodes_to_zero() {
        assert_eq!(codec().decode("").unwrap(), Id::NONE);
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        let err = codec().decode("3wedg!zLRq").unwrap_err();
        assert!(matches!(err, HashIdError::Decoding(_)));
    }

    #[test]
    fn rejects_multi_value_hashes() {
        let multi = raw(&[1, 2]);
        let err = codec().decode(&multi).unwrap_err();
        assert_eq!(err, HashIdError::Decoding("expected exactly 1 id, decoded 2".into()));
    }

    #[test]
    fn rejects_values_beyond_i64() {
        let big = raw(&[u64::MAX]);
        assert!(codec().decode(&big).is_err());
    }

    #[test]
    fn non_positive_ids_are_not_encoded() {
        assert!(matches!(codec().encode(Id(0)), Err(HashIdError::Encoding(_))));
        assert!(matches!(codec().encode(Id(-5)), Err(HashIdError::Encoding(_))));
        assert_eq!(codec().encode_string(Id(-5)), "");
    }

    #[test]
    fn empty_salt_is_invalid_config() {
        assert!(matches!(HashId::new("", 10), Err(HashIdError::InvalidConfig(_))));
        let cfg = configs::HashIdConfig { salt: "s".into(), min_length: None };
        assert!(HashId::from_config(&cfg).is_err());
    }

    #[test]
    fn json_scalar_convention() {
        let h = codec();
        assert_eq!(h.marshal_json(Id(0)).unwrap(), "null");
        assert_eq!(h.marshal_json(Id(1)).unwrap(), "\"3wedgpzLRq\"");
        assert_eq!(h.unmarshal_json(b"\"3wedgpzLRq\"").unwrap(), Id(1));
        assert_eq!(h.unmarshal_json(b" null ").unwrap(), Id::NONE);
        assert_eq!(h.unmarshal_json(b"\"\"").unwrap(), Id::NONE);
        assert!(h.unmarshal_json(b"\"nope!\"").is_err());
    }

    #[test]
    fn shared_across_threads() {
        let h = std::sync::Arc::new(codec());
        let handles: Vec<_> = (1..=8i64)
            .map(|n| {
                let h = std::sync::Arc::clone(&h);
                std::thread::spawn(move || {
                    let s = h.encode(Id(n * 1000)).unwrap();
                    h.decode(&s).unwrap()
                })
            })
            .collect();
        for (n, handle) in (1..=8i64).zip(handles) {
            assert_eq!(handle.join().unwrap(), Id(n * 1000));
        }
    }
}
