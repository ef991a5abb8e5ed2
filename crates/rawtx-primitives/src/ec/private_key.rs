//! secp256k1 signing keys.

use std::fmt;

use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// A secp256k1 scalar in `[1, n)`.
///
/// The scalar is wiped on drop and never appears in `Debug` output, which
/// shows the derived public key instead.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// 32 big-endian bytes. Zero and values at or above the group order
    /// are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {PRIVATE_KEY_BYTES_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        SigningKey::from_slice(bytes)
            .map(|inner| PrivateKey { inner })
            .map_err(|_| PrivateKey::out_of_range())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".into(),
            ));
        }
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        Self::from_bytes(&bytes)
    }

    fn out_of_range() -> PrimitivesError {
        PrimitivesError::InvalidPrivateKey("scalar out of range".into())
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_BYTES_LEN]> {
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_BYTES_LEN]);
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Deterministic (RFC6979) low-S signature over `hash`.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pub_key", &self.pub_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        *self.to_bytes() == *other.to_bytes()
    }
}

impl Eq for PrivateKey {}
