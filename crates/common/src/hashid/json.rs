//! serde glue for identifiers.
//!
//! The codec is passed explicitly: [`EncodedId`] borrows it for
//! serialization and [`IdSeed`] for deserialization.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, Visitor};
use serde::ser::{Error as _, Serialize, Serializer};

use super::{strip_quotes, HashId, Id, IdHasher};

/// Serializes as `null` for zero, as the encoded string otherwise.
#[derive(Clone, Copy)]
pub struct EncodedId<'a> {
    codec: &'a HashId,
    id: Id,
}

impl<'a> EncodedId<'a> {
    pub fn new(codec: &'a HashId, id: Id) -> Self {
        Self { codec, id }
    }
}

impl fmt::Debug for EncodedId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncodedId").field(&self.id).finish()
    }
}

impl Serialize for EncodedId<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.id.is_none() {
            return serializer.serialize_none();
        }
        let hash = self.codec.encode(self.id).map_err(S::Error::custom)?;
        serializer.serialize_str(&hash)
    }
}

/// Deserializes `null` to [`Id::NONE`] and a string to its decoded id.
#[derive(Clone, Copy)]
pub struct IdSeed<'a> {
    codec: &'a HashId,
}

impl<'a> IdSeed<'a> {
    pub fn new(codec: &'a HashId) -> Self {
        Self { codec }
    }
}

impl<'de> DeserializeSeed<'de> for IdSeed<'_> {
    type Value = Id;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Id, D::Error> {
        deserializer.deserialize_option(IdVisitor { codec: self.codec })
    }
}

struct IdVisitor<'a> {
    codec: &'a HashId,
}

impl<'de> Visitor<'de> for IdVisitor<'_> {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an encoded id string or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Id, E> {
        Ok(Id::NONE)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Id, E> {
        Ok(Id::NONE)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Id, D::Error> {
        deserializer.deserialize_str(self)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Id, E> {
        self.codec.decode(strip_quotes(v)).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct UserView<'a> {
        id: EncodedId<'a>,
        parent_id: EncodedId<'a>,
        name: &'static str,
    }

    #[test]
    fn embeds_ids_in_documents() {
        let codec = HashId::new("test", 10).unwrap();
        let view = UserView {
            id: codec.encoded(Id(1)),
            parent_id: codec.encoded(Id::NONE),
            name: "ann",
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value, json!({"id": "3wedgpzLRq", "parent_id": null, "name": "ann"}));
    }

    #[test]
    fn seed_reads_strings_and_null() {
        let codec = HashId::new("test", 10).unwrap();
        let mut de = serde_json::Deserializer::from_str("\"3wedgpzLRq\"");
        assert_eq!(codec.seed().deserialize(&mut de).unwrap(), Id(1));

        let mut de = serde_json::Deserializer::from_str("null");
        assert_eq!(codec.seed().deserialize(&mut de).unwrap(), Id::NONE);
    }

    #[test]
    fn seed_strips_quote_framing() {
        let codec = HashId::new("test", 10).unwrap();
        let mut de = serde_json::Deserializer::from_str(r#""\"3wedgpzLRq\"""#);
        assert_eq!(codec.seed().deserialize(&mut de).unwrap(), Id(1));
    }

    #[test]
    fn seed_propagates_decode_failure() {
        let codec = HashId::new("test", 10).unwrap();
        let mut de = serde_json::Deserializer::from_str("\"not-a-hash\"");
        let err = codec.seed().deserialize(&mut de).unwrap_err();
        assert!(err.to_string().contains("decoding error"));

        let mut de = serde_json::Deserializer::from_str("17");
        assert!(codec.seed().deserialize(&mut de).is_err());
    }

    #[test]
    fn serializing_negative_id_fails() {
        let codec = HashId::new("test", 10).unwrap();
        assert!(serde_json::to_string(&codec.encoded(Id(-1))).is_err());
    }
}
