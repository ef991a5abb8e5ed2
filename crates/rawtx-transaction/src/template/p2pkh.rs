//! P2PKH: locked by `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`,
//! spent with `<sig> <compressed pubkey>`.

use rawtx_primitives::ec::PrivateKey;
use rawtx_script::Script;

use crate::sighash::SIGHASH_ALL;
use crate::template::{checked_index, sign_with_flag, source_script, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// 1 + 72 (longest low-S DER signature and flag) + 1 + 33 (compressed key).
pub const ESTIMATED_UNLOCK_LEN: u32 = 107;

pub fn unlock(private_key: PrivateKey, sighash_flag: Option<u32>) -> P2PKH {
    P2PKH {
        private_key,
        sighash_flag: sighash_flag.unwrap_or(SIGHASH_ALL),
    }
}

pub struct P2PKH {
    private_key: PrivateKey,
    sighash_flag: u32,
}

impl UnlockingScriptTemplate for P2PKH {
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError> {
        let idx = checked_index(tx, input_index)?;
        let pub_key = self.private_key.pub_key();

        match source_script(tx, idx)?.public_key_hash() {
            Ok(hash) if hash == pub_key.hash160() => {}
            Ok(_) => {
                return Err(TransactionError::SigningError(format!(
                    "input {idx} is locked to a different public key hash"
                )))
            }
            Err(_) => {
                return Err(TransactionError::SigningError(format!(
                    "input {idx} does not spend a P2PKH output"
                )))
            }
        }

        let digest = tx.calc_input_signature_hash(idx, self.sighash_flag)?;
        let mut script = Script::new();
        script.append_push_data(&sign_with_flag(&self.private_key, &digest, self.sighash_flag)?)?;
        script.append_push_data(&pub_key.to_compressed())?;
        Ok(script)
    }

    fn estimate_length(&self, _tx: &Transaction, _input_index: u32) -> u32 {
        ESTIMATED_UNLOCK_LEN
    }
}
