//! Pay-to-Script-Hash (P2SH) script template.
//!
//! Locking script `OP_HASH160 <script hash> OP_EQUAL`. The spend reveals a
//! redeem script, which must itself be a P2PKH or P2PK script for the
//! signing key. The redeem script is the script code committed by the
//! signature hash.
//!
//! Unlocking scripts:
//! - P2PKH redeem script: `<sig> <pubkey> <redeem script>`
//! - P2PK redeem script: `<sig> <redeem script>`

use rawtx_primitives::ec::PrivateKey;
use rawtx_primitives::hash::hash160;
use rawtx_script::chunk::push_data_prefix;
use rawtx_script::Script;

use crate::sighash::{self, SIGHASH_ALL};
use crate::template::p2pk::matches_key;
use crate::template::{checked_index, sign_with_flag, source_script, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Estimated unlocking script length for spending through `redeem_script`:
/// the inner P2PK or P2PKH unlock followed by a push of the redeem script.
pub fn estimated_unlock_len(redeem_script: &Script) -> u32 {
    let inner = if redeem_script.is_p2pk() {
        super::p2pk::ESTIMATED_UNLOCK_LEN
    } else {
        super::p2pkh::ESTIMATED_UNLOCK_LEN
    };
    let redeem_len = redeem_script.len();
    let prefix_len = push_data_prefix(redeem_len).map_or(5, |p| p.len());
    inner + (prefix_len + redeem_len) as u32
}

/// Create a P2SH unlocker for `redeem_script`.
///
/// # Arguments
/// * `private_key` - The key the redeem script pays to.
/// * `redeem_script` - A P2PKH or P2PK script for that key.
/// * `sighash_flag` - Optional sighash flag. Defaults to `SIGHASH_ALL`.
///
/// # Returns
/// The template, or a signing error if the redeem script is not a P2PKH or
/// P2PK script for `private_key`.
pub fn unlock(
    private_key: PrivateKey,
    redeem_script: Script,
    sighash_flag: Option<u32>,
) -> Result<P2SH, TransactionError> {
    let pub_key = private_key.pub_key();
    let kind = if let Ok(hash) = redeem_script.public_key_hash() {
        if hash != pub_key.hash160() {
            return Err(TransactionError::SigningError(
                "redeem script pays to a different public key hash".to_string(),
            ));
        }
        RedeemKind::PubKeyHash
    } else if let Ok(key_bytes) = redeem_script.p2pk_public_key() {
        if !matches_key(key_bytes, &pub_key) {
            return Err(TransactionError::SigningError(
                "redeem script pays to a different public key".to_string(),
            ));
        }
        RedeemKind::PubKey
    } else {
        return Err(TransactionError::SigningError(
            "unsupported redeem script: expected P2PKH or P2PK".to_string(),
        ));
    };

    Ok(P2SH {
        private_key,
        redeem_script,
        kind,
        sighash_flag: sighash_flag.unwrap_or(SIGHASH_ALL),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RedeemKind {
    PubKeyHash,
    PubKey,
}

/// P2SH signing template holding the key, redeem script, and sighash flag.
pub struct P2SH {
    private_key: PrivateKey,
    redeem_script: Script,
    kind: RedeemKind,
    sighash_flag: u32,
}

impl P2SH {
    /// The redeem script revealed by the spend.
    pub fn redeem_script(&self) -> &Script {
        &self.redeem_script
    }
}

impl UnlockingScriptTemplate for P2SH {
    /// Sign the specified input and produce the unlocking script.
    ///
    /// The input's source output must be a P2SH script whose hash matches
    /// hash160 of the redeem script.
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError> {
        let idx = checked_index(tx, input_index)?;

        let source_script = source_script(tx, idx)?;
        let script_hash = source_script.script_hash().map_err(|_| {
            TransactionError::SigningError(format!("input {} does not spend a P2SH output", idx))
        })?;
        if script_hash != hash160(self.redeem_script.to_bytes()) {
            return Err(TransactionError::SigningError(format!(
                "redeem script does not match the script hash of input {}",
                idx
            )));
        }

        let sig_hash = sighash::signature_hash(
            tx,
            idx,
            self.redeem_script.to_bytes(),
            self.sighash_flag,
        )?;
        let sig_buf = sign_with_flag(&self.private_key, &sig_hash, self.sighash_flag)?;

        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        if self.kind == RedeemKind::PubKeyHash {
            script.append_push_data(&self.private_key.pub_key().to_compressed())?;
        }
        script.append_push_data(self.redeem_script.to_bytes())?;
        Ok(script)
    }

    fn estimate_length(&self, _tx: &Transaction, _input_index: u32) -> u32 {
        estimated_unlock_len(&self.redeem_script)
    }
}
