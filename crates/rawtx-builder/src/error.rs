use rawtx_transaction::TransactionError;

/// Broad category of a [`BuildError`].
///
/// Callers that need to branch on the failure (retry with more UTXOs, ask
/// for a different address) match on the kind rather than the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field is missing or malformed.
    Validation,
    /// The amount is not a positive value.
    InvalidAmount,
    /// The supplied UTXOs cannot cover amount plus fee.
    InsufficientFunds,
    /// An address or previous output uses an unrecognized encoding.
    UnsupportedAddress,
    /// A signature hash or signature could not be produced.
    Signing,
}

/// Errors returned by the transaction builder.
///
/// The messages of the unit variants are part of the public contract and
/// never change.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No UTXOs provided")]
    NoUtxos,

    #[error("Private key is missing")]
    MissingPrivateKey,

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Target address is missing")]
    MissingTargetAddress,

    #[error("Invalid amount")]
    InvalidAmount,

    /// A UTXO entry is missing a required field or has a malformed one.
    #[error("Invalid UTXO: {0}")]
    InvalidUtxo(String),

    #[error("Insufficient funds")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("Unsupported address: {0}")]
    UnsupportedAddress(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl BuildError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::NoUtxos
            | BuildError::MissingPrivateKey
            | BuildError::InvalidPrivateKey(_)
            | BuildError::MissingTargetAddress
            | BuildError::InvalidUtxo(_)
            | BuildError::Config(_) => ErrorKind::Validation,
            BuildError::InvalidAmount => ErrorKind::InvalidAmount,
            BuildError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            BuildError::UnsupportedAddress(_) => ErrorKind::UnsupportedAddress,
            BuildError::Signing(_) => ErrorKind::Signing,
        }
    }
}

impl From<TransactionError> for BuildError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::SigningError(msg) => BuildError::Signing(msg),
            other => BuildError::Signing(other.to_string()),
        }
    }
}
