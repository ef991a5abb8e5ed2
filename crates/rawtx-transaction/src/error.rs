use rawtx_primitives::PrimitivesError;
use rawtx_script::ScriptError;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Structurally unusable transaction, such as an input index past the end.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An unlocking script could not be produced.
    #[error("signing error: {0}")]
    SigningError(String),
    /// Truncated or otherwise undecodable wire bytes.
    #[error("serialization error: {0}")]
    SerializationError(String),
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}
