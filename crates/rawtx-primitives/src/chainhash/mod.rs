//! 32-byte identifiers for transactions.
//!
//! Bytes are held in wire order. Text form (`Display`, `from_hex`, serde)
//! is the reversed order that explorers and UTXO sets show.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::PrimitivesError;

pub const HASH_SIZE: usize = 32;

/// Length of the hex text form.
pub const HASH_STRING_SIZE: usize = HASH_SIZE * 2;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Wire-order bytes. Fails unless `bytes` is exactly 32 long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        <[u8; HASH_SIZE]>::try_from(bytes).map(Hash).map_err(|_| {
            PrimitivesError::InvalidHash(format!(
                "invalid hash length of {}, want {HASH_SIZE}",
                bytes.len()
            ))
        })
    }

    /// Parses the reversed text form. Exactly 64 hex digits, no padding.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "hash string must be {HASH_STRING_SIZE} hex characters, got {}",
                hex_str.len()
            )));
        }
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(hex_str, &mut bytes)?;
        bytes.reverse();
        Ok(Hash(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().rev().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// `sha256d(data)` as a [`Hash`].
pub fn double_hash_h(data: &[u8]) -> Hash {
    Hash(sha256d(data))
}
