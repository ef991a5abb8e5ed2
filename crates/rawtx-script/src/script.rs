//! The [`Script`] byte buffer and the standard output forms.
//!
//! | form  | bytes                                                  |
//! |-------|--------------------------------------------------------|
//! | P2PKH | `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`    |
//! | P2SH  | `OP_HASH160 <20> OP_EQUAL`                             |
//! | P2PK  | `<33 or 65 byte key> OP_CHECKSIG`                      |

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::opcodes::*;
use crate::ScriptError;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        hex::decode(hex_str)
            .map(Script)
            .map_err(|e| ScriptError::InvalidHex(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    pub fn new_p2pkh(public_key_hash: &[u8; 20]) -> Self {
        let mut b = vec![OP_DUP, OP_HASH160, OP_DATA_20];
        b.extend_from_slice(public_key_hash);
        b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script(b)
    }

    pub fn new_p2sh(script_hash: &[u8; 20]) -> Self {
        let mut b = vec![OP_HASH160, OP_DATA_20];
        b.extend_from_slice(script_hash);
        b.push(OP_EQUAL);
        Script(b)
    }

    pub fn new_p2pk(public_key: &[u8]) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        script.append_push_data(public_key)?;
        script.0.push(OP_CHECKSIG);
        Ok(script)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_p2pkh(&self) -> bool {
        self.p2pkh_hash_bytes().is_some()
    }

    pub fn is_p2sh(&self) -> bool {
        self.p2sh_hash_bytes().is_some()
    }

    pub fn is_p2pk(&self) -> bool {
        self.p2pk_public_key().is_ok()
    }

    fn p2pkh_hash_bytes(&self) -> Option<&[u8]> {
        match self.0.as_slice() {
            [OP_DUP, OP_HASH160, OP_DATA_20, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG]
                if hash.len() == 20 =>
            {
                Some(hash)
            }
            _ => None,
        }
    }

    fn p2sh_hash_bytes(&self) -> Option<&[u8]> {
        match self.0.as_slice() {
            [OP_HASH160, OP_DATA_20, hash @ .., OP_EQUAL] if hash.len() == 20 => Some(hash),
            _ => None,
        }
    }

    fn expect_form(&self, bytes: Option<&[u8]>, form: &'static str) -> Result<[u8; 20], ScriptError> {
        if self.0.is_empty() {
            return Err(ScriptError::EmptyScript);
        }
        bytes
            .and_then(|b| <[u8; 20]>::try_from(b).ok())
            .ok_or(ScriptError::UnexpectedTemplate(form))
    }

    pub fn public_key_hash(&self) -> Result<[u8; 20], ScriptError> {
        self.expect_form(self.p2pkh_hash_bytes(), "P2PKH")
    }

    pub fn script_hash(&self) -> Result<[u8; 20], ScriptError> {
        self.expect_form(self.p2sh_hash_bytes(), "P2SH")
    }

    /// The key pushed by a P2PK script. The prefix byte must match the
    /// length: `02`/`03` for 33 bytes, `04`/`06`/`07` for 65.
    pub fn p2pk_public_key(&self) -> Result<&[u8], ScriptError> {
        let key = match self.0.as_slice() {
            [] => return Err(ScriptError::EmptyScript),
            [OP_DATA_33, key @ .., OP_CHECKSIG] if key.len() == 33 => key,
            [OP_DATA_65, key @ .., OP_CHECKSIG] if key.len() == 65 => key,
            _ => return Err(ScriptError::UnexpectedTemplate("P2PK")),
        };
        match (key.len(), key[0]) {
            (33, 0x02 | 0x03) | (65, 0x04 | 0x06 | 0x07) => Ok(key),
            _ => Err(ScriptError::UnexpectedTemplate("P2PK")),
        }
    }

    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    /// Pushes `data` with the shortest prefix that fits.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        self.0.extend(push_data_prefix(data.len())?);
        self.0.extend_from_slice(data);
        Ok(())
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({self})")
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
