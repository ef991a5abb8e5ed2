/// Errors from key handling, signatures and byte decoding.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// Wrong length, zero, or not below the curve order.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Not a valid SEC1 point encoding.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A chain hash of the wrong length.
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    /// A reader ran out of bytes.
    #[error("unexpected end of data")]
    UnexpectedEof,
}
