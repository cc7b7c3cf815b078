use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

pub const NATIONAL_ID_HASH_LENGTH: usize = 12;

/// Fixed-width opaque credential a voter declares at registration and an
/// officer attests to during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NationalIdHash(pub [u8; NATIONAL_ID_HASH_LENGTH]);

impl NationalIdHash {
    pub fn new(raw: [u8; NATIONAL_ID_HASH_LENGTH]) -> Self {
        Self(raw)
    }

    /// An all-zero hash counts as an empty credential.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Left-aligns up to twelve bytes, zero padding the remainder.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() > NATIONAL_ID_HASH_LENGTH {
            return Err(Error::InvalidNationalIdHash(format!(
                "expected at most {NATIONAL_ID_HASH_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }

        let mut raw = [0u8; NATIONAL_ID_HASH_LENGTH];
        raw[..bytes.len()].copy_from_slice(bytes);

        Ok(Self(raw))
    }
}

impl std::fmt::Display for NationalIdHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for NationalIdHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(stripped).map_err(|err| Error::InvalidNationalIdHash(err.to_string()))?;

        Self::from_bytes(&bytes)
    }
}

impl Serialize for NationalIdHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NationalIdHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
