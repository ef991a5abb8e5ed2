use rawtx_primitives::PrimitivesError;

/// Failures while parsing or building scripts and decoding addresses.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    // script bytes
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("script is empty")]
    EmptyScript,
    /// A push ran past the end of the script.
    #[error("push data truncated")]
    DataTooSmall,
    #[error("push data exceeds 4 GiB")]
    DataTooBig,
    /// The script is not of the requested standard form.
    #[error("not a {0} script")]
    UnexpectedTemplate(&'static str),

    // addresses
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("address {0} has the wrong payload length")]
    InvalidAddressLength(String),
    #[error("address checksum mismatch")]
    EncodingChecksumFailed,
    /// Well-formed Base58Check with a version byte this crate cannot pay to.
    #[error("unsupported address type: {0}")]
    UnsupportedAddress(String),

    #[error(transparent)]
    Primitives(#[from] PrimitivesError),
}
