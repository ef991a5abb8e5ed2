//! Coin selection.
//!
//! A [`CoinSelector`] picks which UTXOs fund a payment. Every strategy
//! honors the same contract: the selected values sum to at least the
//! amount plus the fee of a transaction without change, or the call fails
//! with [`BuildError::InsufficientFunds`].

use rawtx_transaction::TransactionOutput;
use tracing::debug;

use crate::fee::{input_size, FeePolicy};
use crate::scripts::PreviousOutput;
use crate::utxo::ValidatedUtxo;
use crate::BuildError;

/// A UTXO paired with the output it spends, so its signed input size is
/// known before it is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub utxo: ValidatedUtxo,
    pub previous: PreviousOutput,
}

impl Candidate {
    pub fn new(utxo: ValidatedUtxo, previous: PreviousOutput) -> Self {
        Candidate { utxo, previous }
    }

    pub fn value(&self) -> u64 {
        self.utxo.value
    }

    /// Estimated serialized size of the signed input.
    pub fn input_size(&self) -> usize {
        input_size(self.previous.estimated_unlock_len())
    }
}

/// Evaluates a fee policy against the two possible output layouts.
pub struct FeeQuote<'a> {
    policy: &'a dyn FeePolicy,
    target_only: [TransactionOutput; 1],
    target_and_change: [TransactionOutput; 2],
}

impl<'a> FeeQuote<'a> {
    /// `target` is the payment output; `change` is a change output whose
    /// value does not matter, only its script.
    pub fn new(
        policy: &'a dyn FeePolicy,
        target: TransactionOutput,
        change: TransactionOutput,
    ) -> Self {
        FeeQuote {
            policy,
            target_only: [target.clone()],
            target_and_change: [target, change],
        }
    }

    /// Fee for inputs of `input_sizes` paying only the target.
    pub fn without_change(&self, input_sizes: &[usize]) -> u64 {
        self.policy.fee(input_sizes, &self.target_only)
    }

    /// Fee for inputs of `input_sizes` paying the target plus change.
    pub fn with_change(&self, input_sizes: &[usize]) -> u64 {
        self.policy.fee(input_sizes, &self.target_and_change)
    }
}

/// The inputs chosen to fund a payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Selected candidates, in the order they become transaction inputs.
    pub inputs: Vec<Candidate>,
    /// Sum of the selected values.
    pub total_value: u64,
    /// Fee of the transaction without a change output.
    pub fee_without_change: u64,
    /// Fee of the transaction with a change output.
    pub fee_with_change: u64,
}

/// A coin selection strategy.
pub trait CoinSelector: Send + Sync {
    /// Select candidates covering `amount` plus fee.
    fn select(
        &self,
        candidates: &[Candidate],
        amount: u64,
        fees: &FeeQuote<'_>,
    ) -> Result<Selection, BuildError>;
}

/// Take UTXOs in the order supplied until they cover amount plus fee.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstFit;

impl CoinSelector for FirstFit {
    fn select(
        &self,
        candidates: &[Candidate],
        amount: u64,
        fees: &FeeQuote<'_>,
    ) -> Result<Selection, BuildError> {
        accumulate(candidates.iter(), amount, fees)
    }
}

/// Take the largest UTXOs first, which keeps the input count low.
#[derive(Clone, Copy, Debug, Default)]
pub struct LargestFirst;

impl CoinSelector for LargestFirst {
    fn select(
        &self,
        candidates: &[Candidate],
        amount: u64,
        fees: &FeeQuote<'_>,
    ) -> Result<Selection, BuildError> {
        let mut ordered: Vec<&Candidate> = candidates.iter().collect();
        // Stable, so equal values keep their supplied order.
        ordered.sort_by(|a, b| b.value().cmp(&a.value()));
        accumulate(ordered.into_iter(), amount, fees)
    }
}

fn accumulate<'c>(
    candidates: impl Iterator<Item = &'c Candidate>,
    amount: u64,
    fees: &FeeQuote<'_>,
) -> Result<Selection, BuildError> {
    let mut selected = Vec::new();
    let mut sizes = Vec::new();
    let mut total_value = 0u64;
    let mut required = amount;

    for candidate in candidates {
        total_value = total_value.saturating_add(candidate.value());
        sizes.push(candidate.input_size());
        selected.push(candidate.clone());

        let fee_without_change = fees.without_change(&sizes);
        let Some(needed) = amount.checked_add(fee_without_change) else {
            required = u64::MAX;
            break;
        };
        required = needed;
        if total_value >= required {
            let fee_with_change = fees.with_change(&sizes);
            debug!(
                inputs = selected.len(),
                input_bytes = sizes.iter().sum::<usize>(),
                total_value,
                fee_without_change,
                fee_with_change,
                "selected inputs"
            );
            return Ok(Selection {
                inputs: selected,
                total_value,
                fee_without_change,
                fee_with_change,
            });
        }
    }

    debug!(available = total_value, required, "insufficient funds");
    Err(BuildError::InsufficientFunds {
        available: total_value,
        required,
    })
}
