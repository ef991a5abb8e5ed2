//! The construction pipeline.
//!
//! `validate -> scripts -> select -> change -> template -> sign`. Each stage
//! consumes the previous one's output; nothing is shared between calls, so
//! a single builder can serve any number of threads.

use std::fmt;

use rawtx_script::Address;
use rawtx_transaction::{Transaction, TransactionInput, TransactionOutput};
use tracing::debug;

use crate::change::ChangeCalculator;
use crate::config::BuilderConfig;
use crate::fee::FeePolicy;
use crate::scripts::ScriptBuilder;
use crate::selector::{Candidate, CoinSelector, FeeQuote, FirstFit};
use crate::signer::Signer;
use crate::state::{SignedTransaction, UnsignedTransaction};
use crate::utxo::Utxo;
use crate::validator::{self, decode_address};
use crate::BuildError;

/// Builds signed transactions paying an amount to an address.
///
/// ```no_run
/// use rawtx_builder::{TransactionBuilder, Utxo};
///
/// let utxos = vec![Utxo::new("a1b2c3d4e5f67890123456789012345678901234567890123456789012345678", 0, 50_000)];
/// let signed = TransactionBuilder::default()
///     .build(&utxos, "2N8hwP1WmJrFF5QWABn38y63uYLhnJYJYTF", 30_000,
///            "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef")?;
/// println!("{} pays fee {}", signed.tx_id_hex(), signed.fee());
/// # Ok::<(), rawtx_builder::BuildError>(())
/// ```
pub struct TransactionBuilder {
    config: BuilderConfig,
    selector: Box<dyn CoinSelector>,
    fee_policy: Box<dyn FeePolicy>,
    change_address: Option<Address>,
}

impl TransactionBuilder {
    /// Create a builder using first-fit selection and the configured fee.
    pub fn new(config: BuilderConfig) -> Self {
        let fee_policy = config.fee.policy();
        TransactionBuilder {
            config,
            selector: Box::new(FirstFit),
            fee_policy,
            change_address: None,
        }
    }

    /// Replace the coin selection strategy.
    pub fn with_selector(mut self, selector: impl CoinSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Replace the fee policy named by the configuration.
    pub fn with_fee_policy(mut self, fee_policy: impl FeePolicy + 'static) -> Self {
        self.fee_policy = Box::new(fee_policy);
        self
    }

    /// Send change to `address` instead of the signing key's own address.
    pub fn with_change_address(mut self, address: &str) -> Result<Self, BuildError> {
        self.change_address = Some(decode_address(address.trim())?);
        Ok(self)
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Run the pipeline up to the unsigned template.
    pub fn prepare(
        &self,
        utxos: &[Utxo],
        target_address: &str,
        amount: u64,
        private_key: &str,
    ) -> Result<UnsignedTransaction, BuildError> {
        self.config.validate()?;
        let request = validator::validate(utxos, target_address, amount, private_key)?;

        let scripts = ScriptBuilder::new(request.private_key.pub_key(), request.target.network);
        let target_script = request.target.locking_script();
        let change_script = match &self.change_address {
            Some(address) => address.locking_script(),
            None => scripts.change_address().locking_script(),
        };
        let candidates = request
            .utxos
            .into_iter()
            .map(|utxo| -> Result<Candidate, BuildError> {
                let previous = scripts.previous_output(&utxo)?;
                Ok(Candidate::new(utxo, previous))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let quote = FeeQuote::new(
            self.fee_policy.as_ref(),
            TransactionOutput::new(amount, target_script.clone()),
            TransactionOutput::new_change(0, change_script.clone()),
        );
        let selection = self.selector.select(&candidates, amount, &quote)?;
        let plan = ChangeCalculator::new(self.config.dust_threshold).calculate(&selection, amount);

        let mut tx = Transaction::new();
        tx.version = self.config.version;
        tx.lock_time = self.config.lock_time;
        for candidate in &selection.inputs {
            let mut input = TransactionInput::new(&candidate.utxo.txid, candidate.utxo.vout);
            input.sequence_number = self.config.sequence;
            input.set_source_output(Some(TransactionOutput::new(
                candidate.previous.value,
                candidate.previous.locking_script.clone(),
            )));
            tx.add_input(input);
        }
        tx.add_output(TransactionOutput::new(amount, target_script));
        if let Some(change) = plan.change {
            tx.add_output(TransactionOutput::new_change(change, change_script));
        }

        debug!(
            inputs = tx.input_count(),
            outputs = tx.output_count(),
            input_value = selection.total_value,
            amount,
            change = ?plan.change,
            fee = plan.fee,
            "built unsigned template"
        );

        let previous = selection.inputs.into_iter().map(|c| c.previous).collect();
        let signer = Signer::new(request.private_key, self.config.sighash_type);
        Ok(UnsignedTransaction::new(tx, previous, plan.fee, plan.change, signer))
    }

    /// Build and sign a transaction paying `amount` to `target_address`.
    pub fn build(
        &self,
        utxos: &[Utxo],
        target_address: &str,
        amount: u64,
        private_key: &str,
    ) -> Result<SignedTransaction, BuildError> {
        self.prepare(utxos, target_address, amount, private_key)?
            .sign()
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        TransactionBuilder::new(BuilderConfig::default())
    }
}

impl fmt::Debug for TransactionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionBuilder")
            .field("config", &self.config)
            .field("change_address", &self.change_address)
            .finish_non_exhaustive()
    }
}
