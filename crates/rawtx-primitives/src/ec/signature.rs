//! ECDSA signatures over secp256k1.
//!
//! Nonces are deterministic (RFC6979) and signatures are kept in low-S
//! form, so a given key and digest always produce the same DER bytes.

use k256::ecdsa;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// Longest DER encoding of a low-S secp256k1 signature.
pub const MAX_DER_LEN: usize = 72;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    inner: ecdsa::Signature,
}

impl Signature {
    /// Build a signature from big-endian `r` and `s`.
    ///
    /// Both must be non-zero and below the curve order.
    pub fn from_scalars(r: [u8; 32], s: [u8; 32]) -> Result<Self, PrimitivesError> {
        ecdsa::Signature::from_scalars(r, s)
            .map(|inner| Signature { inner })
            .map_err(|_| PrimitivesError::InvalidSignature("scalar out of range".to_string()))
    }

    /// Big-endian `r`.
    pub fn r(&self) -> [u8; 32] {
        to_array(&self.inner.split_bytes().0)
    }

    /// Big-endian `s`.
    pub fn s(&self) -> [u8; 32] {
        to_array(&self.inner.split_bytes().1)
    }

    /// Parse a strict DER signature (no sighash byte).
    ///
    /// Non-minimal integers, trailing bytes and zero or out-of-range
    /// scalars are rejected.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        ecdsa::Signature::from_der(bytes)
            .map(|inner| Signature { inner })
            .map_err(|e| PrimitivesError::InvalidSignature(format!("malformed DER: {}", e)))
    }

    /// DER encoding of the low-S form of this signature.
    pub fn to_der(&self) -> Vec<u8> {
        self.low_s().to_der().as_bytes().to_vec()
    }

    /// Sign a 32-byte digest.
    pub fn sign(hash: &[u8; 32], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let sig: ecdsa::Signature = priv_key
            .signing_key()
            .sign_prehash(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature { inner: sig }.normalized())
    }

    /// Check this signature over `hash` against `pub_key`.
    pub fn verify(&self, hash: &[u8; 32], pub_key: &PublicKey) -> bool {
        pub_key
            .verifying_key()
            .verify_prehash(hash, &self.low_s())
            .is_ok()
    }

    fn low_s(&self) -> ecdsa::Signature {
        self.inner.normalize_s().unwrap_or(self.inner)
    }

    fn normalized(self) -> Self {
        Signature { inner: self.low_s() }
    }
}

fn to_array(bytes: &k256::FieldBytes) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(bytes);
    out
}
