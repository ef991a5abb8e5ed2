//! Builder configuration.
//!
//! Every field has a default, so a configuration file only names what it
//! changes:
//!
//! ```json
//! { "lock_time": 800000, "sequence": 4294967294,
//!   "fee": { "type": "fixed", "satoshis": 500 } }
//! ```

use rawtx_transaction::input::DEFAULT_SEQUENCE_NUMBER;
use rawtx_transaction::sighash::{SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_MASK, SIGHASH_SINGLE};
use rawtx_transaction::transaction::{DEFAULT_LOCK_TIME, DEFAULT_VERSION};
use serde::{Deserialize, Serialize};

use crate::change::DEFAULT_DUST_THRESHOLD;
use crate::fee::{FeePolicy, FixedFee, PerKilobyteFee};
use crate::BuildError;

/// Default fee rate in satoshis per 1000 bytes.
pub const DEFAULT_FEE_PER_KB: u64 = 1000;

/// Fee policy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeConfig {
    /// A constant fee.
    Fixed { satoshis: u64 },
    /// A rate applied to the estimated transaction size.
    PerKilobyte { satoshis_per_kb: u64 },
}

impl FeeConfig {
    /// Instantiate the configured policy.
    pub fn policy(&self) -> Box<dyn FeePolicy> {
        match *self {
            FeeConfig::Fixed { satoshis } => Box::new(FixedFee::new(satoshis)),
            FeeConfig::PerKilobyte { satoshis_per_kb } => {
                Box::new(PerKilobyteFee::new(satoshis_per_kb))
            }
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig::PerKilobyte {
            satoshis_per_kb: DEFAULT_FEE_PER_KB,
        }
    }
}

/// Settings applied to every transaction a builder produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Transaction version.
    pub version: u32,
    /// Transaction lock time.
    pub lock_time: u32,
    /// Sequence number of every input.
    pub sequence: u32,
    /// Sighash type used for every signature.
    pub sighash_type: u32,
    /// Smallest change value worth an output.
    pub dust_threshold: u64,
    pub fee: FeeConfig,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            version: DEFAULT_VERSION,
            lock_time: DEFAULT_LOCK_TIME,
            sequence: DEFAULT_SEQUENCE_NUMBER,
            sighash_type: SIGHASH_ALL,
            dust_threshold: DEFAULT_DUST_THRESHOLD,
            fee: FeeConfig::default(),
        }
    }
}

impl BuilderConfig {
    /// Load a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: BuilderConfig =
            serde_json::from_str(json).map_err(|e| BuildError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the sighash type is one the signer can produce.
    pub fn validate(&self) -> Result<(), BuildError> {
        let base = self.sighash_type & SIGHASH_MASK;
        let extra = self.sighash_type & !(SIGHASH_MASK | SIGHASH_ANYONECANPAY);
        if base == 0 || base > SIGHASH_SINGLE || extra != 0 {
            return Err(BuildError::Config(format!(
                "unsupported sighash type {:#04x}",
                self.sighash_type
            )));
        }
        Ok(())
    }
}
