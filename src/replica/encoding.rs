//! Serde adapters for the block result wire shape.
//!
//! Byte slices travel as standard base64 strings and big integers as JSON
//! numbers when they fit in 64 bits, decimal strings otherwise. Hex strings
//! are accepted for big integers on input.

use alloy::primitives::U256;
use serde::{Deserialize, Deserializer, Serializer};

/// Byte strings as standard (padded) base64.
pub mod base64_bytes {
    use alloy::primitives::Bytes;
    use base64::prelude::{Engine, BASE64_STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BigIntRepr {
    Number(u64),
    Text(String),
}

impl BigIntRepr {
    fn into_u256<E: serde::de::Error>(self) -> Result<U256, E> {
        match self {
            BigIntRepr::Number(n) => Ok(U256::from(n)),
            BigIntRepr::Text(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

fn write_u256<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    match u64::try_from(*value) {
        Ok(n) => serializer.serialize_u64(n),
        Err(_) => serializer.collect_str(value),
    }
}

/// Required big integers.
pub mod big_int {
    use super::*;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        write_u256(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        BigIntRepr::deserialize(deserializer)?.into_u256()
    }
}

/// Nullable big integers.
pub mod option_big_int {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => write_u256(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<U256>, D::Error> {
        Option::<BigIntRepr>::deserialize(deserializer)?
            .map(BigIntRepr::into_u256)
            .transpose()
    }
}
