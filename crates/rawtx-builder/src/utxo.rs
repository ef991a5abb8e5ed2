//! Spendable outputs supplied by the caller.
//!
//! A [`Utxo`] is the loosely typed record callers hand in (strings straight
//! from an indexer or wallet). Validation turns it into a [`ValidatedUtxo`]
//! with a decoded txid and decoded scripts, which is what the rest of the
//! pipeline works with.

use rawtx_primitives::chainhash::{Hash, HASH_STRING_SIZE};
use rawtx_script::Script;
use serde::{Deserialize, Serialize};

use crate::BuildError;

/// An unspent output as supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    /// Txid of the transaction holding the output, as 64 hex characters in
    /// display (byte-reversed) order.
    pub txid: String,
    /// Index of the output within that transaction.
    #[serde(alias = "outputIndex")]
    pub vout: u32,
    /// Value of the output in satoshis.
    pub value: u64,
    /// Address the output pays to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Hex locking script of the output, if known.
    #[serde(default, alias = "script_pub_key", skip_serializing_if = "Option::is_none")]
    pub script_pub_key: Option<String>,
    /// Hex redeem script, required when the output is P2SH.
    #[serde(default, alias = "redeem_script", skip_serializing_if = "Option::is_none")]
    pub redeem_script: Option<String>,
}

impl Utxo {
    /// Create a UTXO with no locking-script metadata.
    ///
    /// Such an output is assumed to be a P2PKH output of the signing key.
    pub fn new(txid: impl Into<String>, vout: u32, value: u64) -> Self {
        Utxo {
            txid: txid.into(),
            vout,
            value,
            ..Default::default()
        }
    }

    /// Set the address this output pays to.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the hex locking script of this output.
    pub fn with_script_pub_key(mut self, script_hex: impl Into<String>) -> Self {
        self.script_pub_key = Some(script_hex.into());
        self
    }

    /// Set the hex redeem script used to spend a P2SH output.
    pub fn with_redeem_script(mut self, script_hex: impl Into<String>) -> Self {
        self.redeem_script = Some(script_hex.into());
        self
    }

    /// Check the entry's format and decode its fields.
    ///
    /// The address, when present, is only carried along here; it is
    /// decoded when the previous locking script is resolved.
    pub fn validate(&self) -> Result<ValidatedUtxo, BuildError> {
        let txid = self.txid.trim();
        if txid.is_empty() {
            return Err(BuildError::InvalidUtxo("empty txid".to_string()));
        }
        if !txid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BuildError::InvalidUtxo(
                "txid must be hexadecimal".to_string(),
            ));
        }
        if txid.len() != HASH_STRING_SIZE {
            return Err(BuildError::InvalidUtxo(format!(
                "txid length must be {}, got {}",
                HASH_STRING_SIZE,
                txid.len()
            )));
        }
        let hash = Hash::from_hex(txid)
            .map_err(|e| BuildError::InvalidUtxo(format!("txid: {}", e)))?;

        if self.value == 0 {
            return Err(BuildError::InvalidUtxo(format!(
                "output {}:{} has zero value",
                txid, self.vout
            )));
        }

        let script_pub_key = decode_script_field("script_pub_key", self.script_pub_key.as_deref())?;
        let redeem_script = decode_script_field("redeem_script", self.redeem_script.as_deref())?;

        Ok(ValidatedUtxo {
            txid: hash,
            vout: self.vout,
            value: self.value,
            address: self
                .address
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            script_pub_key,
            redeem_script,
        })
    }
}

fn decode_script_field(name: &str, value: Option<&str>) -> Result<Option<Script>, BuildError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(hex_str) => Script::from_hex(hex_str)
            .map(Some)
            .map_err(|e| BuildError::InvalidUtxo(format!("{}: {}", name, e))),
    }
}

/// A UTXO whose fields have been checked and decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedUtxo {
    /// Txid of the transaction holding the output.
    pub txid: Hash,
    /// Output index.
    pub vout: u32,
    /// Value in satoshis, never zero.
    pub value: u64,
    /// Address the output pays to, still undecoded.
    pub address: Option<String>,
    /// Locking script of the output, if supplied.
    pub script_pub_key: Option<Script>,
    /// Redeem script for a P2SH output, if supplied.
    pub redeem_script: Option<Script>,
}

/// Parse a JSON array of UTXOs.
///
/// Accepts `vout` or `outputIndex` for the output index, and `snake_case`
/// or `camelCase` metadata keys. A missing required field is a UTXO format
/// error.
pub fn parse_utxos(json: &str) -> Result<Vec<Utxo>, BuildError> {
    serde_json::from_str(json).map_err(|e| BuildError::InvalidUtxo(e.to_string()))
}
