//! Legacy transactions: the wire format, the signature hash and the
//! unlocking script templates that sign inputs.

pub mod input;
pub mod output;
pub mod sighash;
pub mod template;
pub mod transaction;

mod error;

pub use error::TransactionError;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use transaction::Transaction;

#[cfg(test)]
mod tests;
