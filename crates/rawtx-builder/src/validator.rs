//! Request validation.
//!
//! Runs before any selection work. Checks happen in a fixed order so the
//! same request always reports the same error: presence of the UTXO list,
//! key, target address and amount first, then the format of each UTXO entry,
//! then decoding of the key and of the target address.

use rawtx_primitives::ec::PrivateKey;
use rawtx_primitives::PrimitivesError;
use rawtx_script::Address;
use tracing::debug;

use crate::utxo::{Utxo, ValidatedUtxo};
use crate::BuildError;

/// A request whose every field has been checked and decoded.
#[derive(Debug)]
pub struct ValidatedRequest {
    pub utxos: Vec<ValidatedUtxo>,
    pub target: Address,
    pub amount: u64,
    pub private_key: PrivateKey,
}

/// Validate the inputs of a build request.
pub fn validate(
    utxos: &[Utxo],
    target_address: &str,
    amount: u64,
    private_key: &str,
) -> Result<ValidatedRequest, BuildError> {
    let target_address = target_address.trim();
    let private_key = private_key.trim();

    if utxos.is_empty() {
        return Err(BuildError::NoUtxos);
    }
    if private_key.is_empty() {
        return Err(BuildError::MissingPrivateKey);
    }
    if target_address.is_empty() {
        return Err(BuildError::MissingTargetAddress);
    }
    if amount == 0 {
        return Err(BuildError::InvalidAmount);
    }

    let utxos = utxos
        .iter()
        .map(Utxo::validate)
        .collect::<Result<Vec<_>, _>>()?;

    let private_key = PrivateKey::from_hex(private_key).map_err(key_error)?;
    let target = decode_address(target_address)?;

    debug!(
        utxos = utxos.len(),
        amount,
        network = ?target.network,
        address_type = ?target.address_type,
        "validated request"
    );

    Ok(ValidatedRequest {
        utxos,
        target,
        amount,
        private_key,
    })
}

/// Decode an address, reporting any failure as an unsupported address.
pub(crate) fn decode_address(address: &str) -> Result<Address, BuildError> {
    Address::from_string(address)
        .map_err(|e| BuildError::UnsupportedAddress(format!("{}: {}", address, e)))
}

fn key_error(e: PrimitivesError) -> BuildError {
    match e {
        PrimitivesError::InvalidPrivateKey(msg) => BuildError::InvalidPrivateKey(msg),
        other => BuildError::InvalidPrivateKey(other.to_string()),
    }
}
