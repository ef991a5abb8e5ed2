/// rawtx - Builds signed raw transactions from spendable outputs.
///
/// The pipeline validates a request, selects UTXOs, computes change and
/// fee, derives locking scripts and unlocking templates, signs each input
/// against the legacy signature hash, and serializes the result:
///
/// - `validator` - request checks, in a fixed order
/// - `selector` - pluggable coin selection (`FirstFit`, `LargestFirst`)
/// - `fee` - pluggable fee policies (`FixedFee`, `PerKilobyteFee`)
/// - `change` - change output or fee absorption
/// - `scripts` - change address, spent-output classification and sizing
/// - `signer` / `state` - the unsigned template and its signed successor

pub mod builder;
pub mod change;
pub mod config;
pub mod fee;
pub mod scripts;
pub mod selector;
pub mod signer;
pub mod state;
pub mod utxo;
pub mod validator;

mod error;
pub use builder::TransactionBuilder;
pub use config::{BuilderConfig, FeeConfig};
pub use error::{BuildError, ErrorKind};
pub use state::{SignedTransaction, UnsignedTransaction};
pub use utxo::{parse_utxos, Utxo, ValidatedUtxo};

/// Build a signed transaction with the default configuration and return
/// its hex serialization.
///
/// `private_key` is the 32-byte signing key as 64 hex characters. UTXOs
/// without locking-script metadata are treated as P2PKH outputs of that key.
pub fn build(
    utxos: &[Utxo],
    target_address: &str,
    amount: u64,
    private_key: &str,
) -> Result<String, BuildError> {
    TransactionBuilder::default()
        .build(utxos, target_address, amount, private_key)
        .map(|signed| signed.to_hex())
}
