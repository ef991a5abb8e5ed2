/// Address handling.
///
/// Decodes Base58Check address strings, verifies the SHA-256d checksum, and
/// classifies the version byte into a network and a script type
/// (pay-to-public-key-hash or pay-to-script-hash). Addresses can also be
/// built from a hash and encoded back to their string form.

use std::fmt;

use rawtx_primitives::ec::PublicKey;
use rawtx_primitives::hash::hash160;

use crate::{Script, ScriptError};

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Mainnet P2SH address version byte.
const MAINNET_P2SH: u8 = 0x05;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;
/// Testnet P2SH address version byte.
const TESTNET_P2SH: u8 = 0xc4;

/// Human-readable prefixes of segwit (bech32) addresses, which are not supported.
const BECH32_PREFIXES: [&str; 3] = ["bc1", "tb1", "bcrt1"];

/// Network type selected by the address version byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    /// Mainnet (P2PKH prefix '1', P2SH prefix '3').
    Mainnet,
    /// Testnet (P2PKH prefix 'm' or 'n', P2SH prefix '2').
    Testnet,
}

/// Script type an address locks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressType {
    /// Pay to public key hash.
    PubKeyHash,
    /// Pay to script hash.
    ScriptHash,
}

/// A decoded Base58Check address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The Base58Check address string.
    pub address_string: String,
    /// The 20-byte hash: hash160 of a public key or of a redeem script.
    pub hash: [u8; 20],
    /// The network this address belongs to.
    pub network: Network,
    /// Whether the hash commits to a public key or a script.
    pub address_type: AddressType,
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// # Arguments
    /// * `addr` - The Base58Check address string.
    ///
    /// # Returns
    /// An `Address`, or:
    /// - `UnsupportedAddress` for bech32 strings and unknown version bytes,
    /// - `InvalidAddress` for characters outside the Base58 alphabet,
    /// - `EncodingChecksumFailed` if the checksum does not match,
    /// - `InvalidAddressLength` if the checked payload is not 21 bytes.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let lower = addr.to_ascii_lowercase();
        if BECH32_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return Err(ScriptError::UnsupportedAddress(addr.to_string()));
        }

        let decoded = bs58::decode(addr)
            .with_check(None)
            .into_vec()
            .map_err(|e| match e {
                bs58::decode::Error::InvalidChecksum { .. } => ScriptError::EncodingChecksumFailed,
                bs58::decode::Error::NoChecksum => {
                    ScriptError::InvalidAddressLength(addr.to_string())
                }
                _ => ScriptError::InvalidAddress(format!("bad char for '{}'", addr)),
            })?;

        // Version byte and hash, checksum already stripped.
        if decoded.len() != 21 {
            return Err(ScriptError::InvalidAddressLength(addr.to_string()));
        }

        let (network, address_type) = match decoded[0] {
            MAINNET_P2PKH => (Network::Mainnet, AddressType::PubKeyHash),
            MAINNET_P2SH => (Network::Mainnet, AddressType::ScriptHash),
            TESTNET_P2PKH => (Network::Testnet, AddressType::PubKeyHash),
            TESTNET_P2SH => (Network::Testnet, AddressType::ScriptHash),
            _ => return Err(ScriptError::UnsupportedAddress(addr.to_string())),
        };

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            hash,
            network,
            address_type,
        })
    }

    /// Create a P2PKH address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        Self::encode(hash, network, AddressType::PubKeyHash)
    }

    /// Create a P2SH address from the 20-byte hash160 of a redeem script.
    pub fn from_script_hash(hash: &[u8; 20], network: Network) -> Self {
        Self::encode(hash, network, AddressType::ScriptHash)
    }

    /// Create the P2PKH address of a public key (compressed encoding).
    pub fn from_public_key(pub_key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&pub_key.hash160(), network)
    }

    /// Create the P2SH address that commits to `redeem_script`.
    pub fn from_redeem_script(redeem_script: &Script, network: Network) -> Self {
        Self::from_script_hash(&hash160(redeem_script.to_bytes()), network)
    }

    /// The version byte this address encodes with.
    pub fn version_byte(&self) -> u8 {
        version_byte(self.network, self.address_type)
    }

    /// Build the locking script that pays to this address.
    pub fn locking_script(&self) -> Script {
        match self.address_type {
            AddressType::PubKeyHash => Script::new_p2pkh(&self.hash),
            AddressType::ScriptHash => Script::new_p2sh(&self.hash),
        }
    }

    fn encode(hash: &[u8; 20], network: Network, address_type: AddressType) -> Self {
        let mut payload = Vec::with_capacity(21);
        payload.push(version_byte(network, address_type));
        payload.extend_from_slice(hash);

        Address {
            address_string: bs58::encode(&payload).with_check().into_string(),
            hash: *hash,
            network,
            address_type,
        }
    }
}

fn version_byte(network: Network, address_type: AddressType) -> u8 {
    match (network, address_type) {
        (Network::Mainnet, AddressType::PubKeyHash) => MAINNET_P2PKH,
        (Network::Mainnet, AddressType::ScriptHash) => MAINNET_P2SH,
        (Network::Testnet, AddressType::PubKeyHash) => TESTNET_P2PKH,
        (Network::Testnet, AddressType::ScriptHash) => TESTNET_P2SH,
    }
}

impl fmt::Display for Address {
    /// Display the address as its Base58Check string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

impl std::str::FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}
