//! The two states a built transaction passes through.
//!
//! [`UnsignedTransaction`] is the template: inputs carry empty unlocking
//! scripts and each input records the output it spends. It exposes exactly
//! what each signature commits to. [`UnsignedTransaction::sign`] consumes it
//! and yields a [`SignedTransaction`].

use rawtx_transaction::sighash;
use rawtx_transaction::Transaction;
use tracing::debug;

use crate::scripts::PreviousOutput;
use crate::signer::Signer;
use crate::BuildError;

/// A fully laid out transaction whose inputs are not yet signed.
#[derive(Debug)]
pub struct UnsignedTransaction {
    tx: Transaction,
    previous: Vec<PreviousOutput>,
    fee: u64,
    change: Option<u64>,
    signer: Signer,
}

impl UnsignedTransaction {
    pub(crate) fn new(
        tx: Transaction,
        previous: Vec<PreviousOutput>,
        fee: u64,
        change: Option<u64>,
        signer: Signer,
    ) -> Self {
        UnsignedTransaction {
            tx,
            previous,
            fee,
            change,
            signer,
        }
    }

    /// The template transaction.
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// Hex serialization of the template, with empty unlocking scripts.
    pub fn template_hex(&self) -> String {
        self.tx.to_hex()
    }

    /// The outputs spent by each input, in input order.
    pub fn previous_outputs(&self) -> &[PreviousOutput] {
        &self.previous
    }

    /// The digest the signature of input `input_index` will sign.
    pub fn signature_hash(&self, input_index: usize) -> Result<[u8; 32], BuildError> {
        let prev = self.previous.get(input_index).ok_or_else(|| {
            BuildError::Signing(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                self.previous.len()
            ))
        })?;
        self.signer.require_matching_output(&self.tx, input_index)?;
        Ok(sighash::signature_hash(
            &self.tx,
            input_index,
            prev.script_code().to_bytes(),
            self.signer.sighash_type(),
        )?)
    }

    /// Fee paid by the transaction.
    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// Value of the change output, if there is one.
    pub fn change(&self) -> Option<u64> {
        self.change
    }

    /// Sign every input.
    pub fn sign(self) -> Result<SignedTransaction, BuildError> {
        let scripts = self.signer.unlocking_scripts(&self.tx, &self.previous)?;

        let mut tx = self.tx;
        for (input, script) in tx.inputs.iter_mut().zip(scripts) {
            input.unlocking_script = Some(script);
        }

        let signed = SignedTransaction {
            tx,
            fee: self.fee,
            change: self.change,
        };
        debug!(
            txid = %signed.tx_id_hex(),
            size = signed.size(),
            fee = signed.fee,
            "signed transaction"
        );
        Ok(signed)
    }
}

/// A transaction with every input signed, ready for broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Transaction,
    fee: u64,
    change: Option<u64>,
}

impl SignedTransaction {
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn into_transaction(self) -> Transaction {
        self.tx
    }

    /// Lowercase hex of the serialized transaction.
    pub fn to_hex(&self) -> String {
        self.tx.to_hex()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.tx.to_bytes()
    }

    pub fn size(&self) -> usize {
        self.tx.size()
    }

    /// Txid in display order.
    pub fn tx_id_hex(&self) -> String {
        self.tx.tx_id_hex()
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn change(&self) -> Option<u64> {
        self.change
    }
}
