//! Scripts, opcodes and Base58Check addresses.
//!
//! [`Script`] is a plain byte buffer with helpers to build and recognise
//! the standard P2PKH, P2SH and P2PK forms. [`Address`] decodes legacy
//! mainnet and testnet addresses into the locking script they pay to.

pub mod address;
pub mod chunk;
pub mod opcodes;
pub mod script;

mod error;

pub use address::{Address, AddressType, Network};
pub use chunk::ScriptChunk;
pub use error::ScriptError;
pub use script::Script;
