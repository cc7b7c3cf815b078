use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::Error;

pub const ADDRESS_LENGTH: usize = 20;

/// Identifies an account on the host ledger.
///
/// Represented as the lower 20 bytes of a keccak256 digest, the same way the
/// host derives account identifiers from public keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    pub fn new(raw: [u8; ADDRESS_LENGTH]) -> Self {
        Self(raw)
    }

    /// Derives a deterministic address from arbitrary seed bytes. Used to give
    /// scripted and test accounts stable identifiers without key material.
    pub fn from_seed(seed: impl AsRef<[u8]>) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(seed.as_ref());
        let hash = hasher.finalize();

        let mut address_bytes = [0u8; ADDRESS_LENGTH];
        address_bytes.copy_from_slice(&hash[(hash.len() - ADDRESS_LENGTH)..]);
        Address(address_bytes)
    }

    pub fn raw_address(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidAddress(s.to_string()))?;

        if stripped.len() != ADDRESS_LENGTH * 2 {
            return Err(Error::InvalidAddress(s.to_string()));
        }

        let address_bytes =
            hex::decode(stripped).map_err(|err| Error::InvalidAddress(err.to_string()))?;

        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&address_bytes);

        Ok(Address(address))
    }
}

// Serialized as a hex string so addresses can key JSON maps.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
