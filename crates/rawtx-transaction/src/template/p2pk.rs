//! Pay-to-Public-Key (P2PK) script template.
//!
//! Locking script `<pubkey> OP_CHECKSIG`, unlocked by a bare `<sig>`.

use rawtx_primitives::ec::{PrivateKey, PublicKey};
use rawtx_script::Script;

use crate::sighash::SIGHASH_ALL;
use crate::template::{checked_index, sign_with_flag, source_script, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// One push opcode plus a DER signature with sighash byte.
pub const ESTIMATED_UNLOCK_LEN: u32 = 73;

/// Create a P2PK unlocker. `sighash_flag` defaults to `SIGHASH_ALL`.
pub fn unlock(private_key: PrivateKey, sighash_flag: Option<u32>) -> P2PK {
    P2PK {
        private_key,
        sighash_flag: sighash_flag.unwrap_or(SIGHASH_ALL),
    }
}

/// P2PK signing template.
pub struct P2PK {
    private_key: PrivateKey,
    sighash_flag: u32,
}

impl UnlockingScriptTemplate for P2PK {
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError> {
        let idx = checked_index(tx, input_index)?;

        let source_script = source_script(tx, idx)?;

        let key_bytes = source_script.p2pk_public_key().map_err(|_| {
            TransactionError::SigningError(format!("input {} does not spend a P2PK output", idx))
        })?;
        if !matches_key(key_bytes, &self.private_key.pub_key()) {
            return Err(TransactionError::SigningError(format!(
                "input {} is locked to a different public key",
                idx
            )));
        }

        let sig_hash = tx.calc_input_signature_hash(idx, self.sighash_flag)?;
        let sig_buf = sign_with_flag(&self.private_key, &sig_hash, self.sighash_flag)?;

        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        Ok(script)
    }

    fn estimate_length(&self, _tx: &Transaction, _input_index: u32) -> u32 {
        ESTIMATED_UNLOCK_LEN
    }
}

/// Whether `key_bytes` encodes `pub_key` in either compressed or
/// uncompressed form.
pub(crate) fn matches_key(key_bytes: &[u8], pub_key: &PublicKey) -> bool {
    key_bytes == pub_key.to_compressed().as_slice()
        || key_bytes == pub_key.to_uncompressed().as_slice()
}
