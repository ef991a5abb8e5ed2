//! Fee policies.
//!
//! The pipeline never assumes a fee formula. It asks a [`FeePolicy`] for the
//! fee of a candidate transaction shape (the estimated size of each input
//! plus the outputs it would carry) and uses the answer as-is.

use rawtx_primitives::util::VarInt;
use rawtx_transaction::input::INPUT_FIXED_SIZE;
use rawtx_transaction::TransactionOutput;

/// Version and lock time.
const TX_FIXED_SIZE: usize = 4 + 4;

/// Serialized size of an input whose unlocking script is `unlock_len`
/// bytes long.
pub fn input_size(unlock_len: usize) -> usize {
    INPUT_FIXED_SIZE + VarInt::from(unlock_len).length() + unlock_len
}

/// A fee policy computes the fee for a transaction shape.
pub trait FeePolicy: Send + Sync {
    /// Fee in satoshis for a transaction whose signed inputs have the sizes
    /// in `input_sizes` and which pays `outputs`.
    fn fee(&self, input_sizes: &[usize], outputs: &[TransactionOutput]) -> u64;
}

/// Estimate the serialized size of a signed transaction.
pub fn estimate_size(input_sizes: &[usize], outputs: &[TransactionOutput]) -> usize {
    TX_FIXED_SIZE
        + VarInt::from(input_sizes.len()).length()
        + input_sizes.iter().sum::<usize>()
        + VarInt::from(outputs.len()).length()
        + outputs.iter().map(TransactionOutput::serialized_size).sum::<usize>()
}

/// Charges the same fee regardless of size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedFee {
    pub satoshis: u64,
}

impl FixedFee {
    pub fn new(satoshis: u64) -> Self {
        FixedFee { satoshis }
    }
}

impl FeePolicy for FixedFee {
    fn fee(&self, _input_sizes: &[usize], _outputs: &[TransactionOutput]) -> u64 {
        self.satoshis
    }
}

/// Charges a rate per 1000 bytes of estimated size, rounded up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerKilobyteFee {
    pub satoshis_per_kb: u64,
}

impl PerKilobyteFee {
    pub fn new(satoshis_per_kb: u64) -> Self {
        PerKilobyteFee { satoshis_per_kb }
    }
}

impl Default for PerKilobyteFee {
    fn default() -> Self {
        PerKilobyteFee { satoshis_per_kb: 1000 }
    }
}

impl FeePolicy for PerKilobyteFee {
    fn fee(&self, input_sizes: &[usize], outputs: &[TransactionOutput]) -> u64 {
        let size = estimate_size(input_sizes, outputs) as u64;
        size.saturating_mul(self.satoshis_per_kb).saturating_add(999) / 1000
    }
}
