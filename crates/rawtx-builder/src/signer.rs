//! Per-input signing.

use rawtx_primitives::ec::{PrivateKey, PublicKey};
use rawtx_script::Script;
use rawtx_transaction::sighash::{SIGHASH_MASK, SIGHASH_SINGLE};
use rawtx_transaction::Transaction;
use tracing::trace;

use crate::scripts::PreviousOutput;
use crate::BuildError;

/// Signs every input of a transaction with one key.
#[derive(Clone, Debug)]
pub struct Signer {
    private_key: PrivateKey,
    sighash_type: u32,
}

impl Signer {
    pub fn new(private_key: PrivateKey, sighash_type: u32) -> Self {
        Signer {
            private_key,
            sighash_type,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.private_key.pub_key()
    }

    pub fn sighash_type(&self) -> u32 {
        self.sighash_type
    }

    /// Fail when input `index` would sign `SIGHASH_SINGLE` without an output
    /// at the same index. Such a signature commits to the constant digest 1
    /// and can be replayed on any transaction spending the same output.
    pub(crate) fn require_matching_output(
        &self,
        tx: &Transaction,
        index: usize,
    ) -> Result<(), BuildError> {
        if self.sighash_type & SIGHASH_MASK == SIGHASH_SINGLE && index >= tx.outputs.len() {
            return Err(BuildError::Signing(format!(
                "SIGHASH_SINGLE input {} has no matching output (tx has {} outputs)",
                index,
                tx.outputs.len()
            )));
        }
        Ok(())
    }

    /// Produce the unlocking script of every input of `tx`.
    ///
    /// `previous[i]` describes the output spent by input `i`. Every script
    /// is computed against `tx` as given, so no input's signature depends
    /// on another input's unlocking script.
    pub fn unlocking_scripts(
        &self,
        tx: &Transaction,
        previous: &[PreviousOutput],
    ) -> Result<Vec<Script>, BuildError> {
        if previous.len() != tx.inputs.len() {
            return Err(BuildError::Signing(format!(
                "{} previous outputs for {} inputs",
                previous.len(),
                tx.inputs.len()
            )));
        }

        let mut scripts = Vec::with_capacity(previous.len());
        for (index, prev) in previous.iter().enumerate() {
            self.require_matching_output(tx, index)?;
            let template = prev.unlocking_template(&self.private_key, self.sighash_type)?;
            let script = template.sign(tx, index as u32)?;
            if script.is_empty() {
                return Err(BuildError::Signing(format!(
                    "empty unlocking script for input {}",
                    index
                )));
            }
            trace!(input = index, script_len = script.len(), "signed input");
            scripts.push(script);
        }
        Ok(scripts)
    }
}
