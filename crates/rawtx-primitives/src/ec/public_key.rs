//! secp256k1 public keys in SEC1 form.

use std::fmt;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

pub const COMPRESSED_LEN: usize = 33;
pub const UNCOMPRESSED_LEN: usize = 65;

/// A point on secp256k1. Equality compares the encoded point, and the
/// compressed encoding is what scripts and addresses are derived from.
#[derive(Clone, Debug)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parses a 33-byte compressed or 65-byte uncompressed SEC1 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPublicKey(
                "pubkey bytes are empty".into(),
            ));
        }
        VerifyingKey::from_sec1_bytes(bytes)
            .map(|inner| PublicKey { inner })
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    fn encode<const N: usize>(&self, compress: bool) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.inner.to_encoded_point(compress).as_bytes());
        out
    }

    /// `02`/`03` parity prefix followed by X.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        self.encode(true)
    }

    /// `04` followed by X and Y.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        self.encode(false)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// RIPEMD160(SHA256(compressed point)), the payload of P2PKH scripts.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    pub fn verify(&self, hash: &[u8; 32], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: vk.clone() }
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
