//! The change address and unlocking templates for inputs.
//!
//! Outputs lock to the script their address names (see
//! [`Address::locking_script`]). Inputs are classified from the locking
//! script of the output they spend, resolved from the UTXO's
//! `script_pub_key`, else its `address`, else the signing key's own P2PKH
//! script.

use rawtx_primitives::ec::{PrivateKey, PublicKey};
use rawtx_script::{Address, Network, Script};
use rawtx_transaction::template::{p2pk, p2pkh, p2sh, UnlockingScriptTemplate};

use crate::utxo::ValidatedUtxo;
use crate::validator::decode_address;
use crate::BuildError;

/// How an input is unlocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpendKind {
    /// `<sig> <pubkey>`
    PubKeyHash,
    /// `<sig>`
    PubKey,
    /// `<sig> [<pubkey>] <redeem script>`
    ScriptHash { redeem_script: Script },
}

/// The output an input spends, classified for signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviousOutput {
    pub locking_script: Script,
    pub value: u64,
    pub kind: SpendKind,
}

impl PreviousOutput {
    /// The script committed to by the signature hash: the redeem script for
    /// a P2SH spend, the locking script otherwise.
    pub fn script_code(&self) -> &Script {
        match &self.kind {
            SpendKind::ScriptHash { redeem_script } => redeem_script,
            _ => &self.locking_script,
        }
    }

    /// Estimated length of the unlocking script this spend will carry.
    pub fn estimated_unlock_len(&self) -> usize {
        let len = match &self.kind {
            SpendKind::PubKeyHash => p2pkh::ESTIMATED_UNLOCK_LEN,
            SpendKind::PubKey => p2pk::ESTIMATED_UNLOCK_LEN,
            SpendKind::ScriptHash { redeem_script } => p2sh::estimated_unlock_len(redeem_script),
        };
        len as usize
    }

    /// Build the unlocking template for this spend.
    pub fn unlocking_template(
        &self,
        private_key: &PrivateKey,
        sighash_type: u32,
    ) -> Result<Box<dyn UnlockingScriptTemplate>, BuildError> {
        let key = private_key.clone();
        let flag = Some(sighash_type);
        Ok(match &self.kind {
            SpendKind::PubKeyHash => Box::new(p2pkh::unlock(key, flag)),
            SpendKind::PubKey => Box::new(p2pk::unlock(key, flag)),
            SpendKind::ScriptHash { redeem_script } => {
                Box::new(p2sh::unlock(key, redeem_script.clone(), flag)?)
            }
        })
    }
}

/// Derives output locking scripts and classifies spent outputs.
#[derive(Clone, Debug)]
pub struct ScriptBuilder {
    public_key: PublicKey,
    network: Network,
}

impl ScriptBuilder {
    /// `public_key` is the signer's key; `network` is the network change
    /// addresses are made for.
    pub fn new(public_key: PublicKey, network: Network) -> Self {
        ScriptBuilder { public_key, network }
    }

    /// P2PKH address of the signing key.
    pub fn change_address(&self) -> Address {
        Address::from_public_key(&self.public_key, self.network)
    }

    /// Resolve and classify the output `utxo` refers to.
    pub fn previous_output(&self, utxo: &ValidatedUtxo) -> Result<PreviousOutput, BuildError> {
        let locking_script = match (&utxo.script_pub_key, &utxo.address) {
            (Some(script), _) => script.clone(),
            (None, Some(address)) => decode_address(address)?.locking_script(),
            (None, None) => Script::new_p2pkh(&self.public_key.hash160()),
        };

        let kind = if locking_script.is_p2pkh() {
            SpendKind::PubKeyHash
        } else if locking_script.is_p2pk() {
            SpendKind::PubKey
        } else if locking_script.is_p2sh() {
            let redeem_script = utxo.redeem_script.clone().ok_or_else(|| {
                BuildError::Signing(format!(
                    "P2SH output {}:{} has no redeem script",
                    utxo.txid, utxo.vout
                ))
            })?;
            SpendKind::ScriptHash { redeem_script }
        } else {
            return Err(BuildError::Signing(format!(
                "unsupported locking script on output {}:{}",
                utxo.txid, utxo.vout
            )));
        };

        Ok(PreviousOutput {
            locking_script,
            value: utxo.value,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use rawtx_primitives::chainhash::Hash;

    const KEY: &str = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
    const KEY_PKH: &str = "a390bb4d6d4ab570767ef21f66c3edc1a4d69026";

    fn builder() -> ScriptBuilder {
        let key = PrivateKey::from_hex(KEY).unwrap();
        ScriptBuilder::new(key.pub_key(), Network::Testnet)
    }

    fn utxo() -> ValidatedUtxo {
        ValidatedUtxo {
            txid: Hash::new([7u8; 32]),
            vout: 1,
            value: 1000,
            address: None,
            script_pub_key: None,
            redeem_script: None,
        }
    }

    #[test]
    fn test_change_address_follows_network() {
        assert_eq!(
            builder().change_address().to_string(),
            "mvRopTGbvzGszJN5fktdL9qU2WhbbEYoLN"
        );
    }

    #[test]
    fn test_default_previous_output_is_own_p2pkh() {
        let prev = builder().previous_output(&utxo()).unwrap();
        assert_eq!(prev.kind, SpendKind::PubKeyHash);
        assert_eq!(prev.locking_script.to_hex(), format!("76a914{}88ac", KEY_PKH));
        assert_eq!(prev.script_code(), &prev.locking_script);
        assert_eq!(prev.value, 1000);
        assert_eq!(prev.estimated_unlock_len(), 107);
    }

    #[test]
    fn test_script_pub_key_takes_precedence_over_address() {
        let mut u = utxo();
        u.address = Some("36XNYSgW7DnZaJsKxDnoZg3BnFa7bDR82p".into());
        u.script_pub_key = Some(Script::new_p2pkh(&[9u8; 20]));
        let prev = builder().previous_output(&u).unwrap();
        assert_eq!(prev.locking_script, Script::new_p2pkh(&[9u8; 20]));
    }

    #[test]
    fn test_previous_output_from_address() {
        let mut u = utxo();
        u.address = Some("2N6N8bjsyapQRVvphBwEuQPCEBbZNZAxjx1".into());
        let err = builder().previous_output(&u).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Signing);

        u.redeem_script = Some(Script::new_p2pkh(&[1u8; 20]));
        let prev = builder().previous_output(&u).unwrap();
        assert!(prev.locking_script.is_p2sh());
        assert_eq!(prev.script_code(), &Script::new_p2pkh(&[1u8; 20]));
        // Inner unlock plus a one-byte push of the 25-byte redeem script.
        assert_eq!(prev.estimated_unlock_len(), 107 + 1 + 25);
    }

    #[test]
    fn test_unsupported_address_on_utxo() {
        let mut u = utxo();
        u.address = Some("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx".into());
        let err = builder().previous_output(&u).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedAddress);
    }

    #[test]
    fn test_p2pk_and_unknown_scripts() {
        let key = PrivateKey::from_hex(KEY).unwrap();
        let mut u = utxo();
        u.script_pub_key = Some(Script::new_p2pk(&key.pub_key().to_compressed()).unwrap());
        let prev = builder().previous_output(&u).unwrap();
        assert_eq!(prev.kind, SpendKind::PubKey);
        assert_eq!(prev.estimated_unlock_len(), 73);

        u.script_pub_key = Some(Script::from_hex("6a0568656c6c6f").unwrap());
        let err = builder().previous_output(&u).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Signing);
    }

    #[test]
    fn test_p2sh_template_rejects_foreign_redeem_script() {
        let key = PrivateKey::from_hex(KEY).unwrap();
        let prev = PreviousOutput {
            locking_script: Script::new_p2sh(&[0u8; 20]),
            value: 1,
            kind: SpendKind::ScriptHash {
                redeem_script: Script::new_p2pkh(&[1u8; 20]),
            },
        };
        let err = prev.unlocking_template(&key, 1).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Signing);
    }
}
