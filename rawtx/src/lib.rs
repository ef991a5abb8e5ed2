#![deny(missing_docs)]

//! rawtx - Raw transaction construction.
//!
//! Re-exports all rawtx components for convenient single-crate usage, and
//! the `build` entry point at the top level.

pub use rawtx_builder as builder;
pub use rawtx_primitives as primitives;
pub use rawtx_script as script;
pub use rawtx_transaction as transaction;

pub use rawtx_builder::{build, BuildError, ErrorKind, TransactionBuilder, Utxo};
