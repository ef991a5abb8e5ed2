//! Producers of unlocking scripts, one per spendable output form.
//!
//! * [`p2pkh::P2PKH`]: `<sig> <pubkey>`
//! * [`p2pk::P2PK`]: `<sig>`
//! * [`p2sh::P2SH`]: the inner unlock followed by a push of the redeem script

pub mod p2pk;
pub mod p2pkh;
pub mod p2sh;

use rawtx_primitives::ec::PrivateKey;
use rawtx_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Signs one input of a transaction.
///
/// Implementations hash the transaction with the sighash rules and read only
/// the output being spent, never the unlocking scripts of other inputs.
pub trait UnlockingScriptTemplate {
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError>;

    /// Upper bound on the unlocking script length, for fee estimation.
    fn estimate_length(&self, tx: &Transaction, input_index: u32) -> u32;
}

/// DER signature of `hash` followed by the one-byte sighash flag.
pub(crate) fn sign_with_flag(
    private_key: &PrivateKey,
    hash: &[u8; 32],
    sighash_flag: u32,
) -> Result<Vec<u8>, TransactionError> {
    let mut sig = private_key.sign(hash)?.to_der();
    sig.push(sighash_flag as u8);
    Ok(sig)
}

/// The locking script of the output spent by input `idx`.
pub(crate) fn source_script(tx: &Transaction, idx: usize) -> Result<&Script, TransactionError> {
    tx.inputs[idx].source_tx_script().ok_or_else(|| {
        TransactionError::SigningError(format!("input {idx} has no source output attached"))
    })
}

pub(crate) fn checked_index(tx: &Transaction, input_index: u32) -> Result<usize, TransactionError> {
    let idx = input_index as usize;
    match tx.inputs.get(idx) {
        Some(_) => Ok(idx),
        None => Err(TransactionError::SigningError(format!(
            "input index {idx} out of range (tx has {} inputs)",
            tx.inputs.len()
        ))),
    }
}
