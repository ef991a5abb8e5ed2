//! Hashing, keys and little-endian encoding shared by the other rawtx crates.

pub mod chainhash;
pub mod ec;
pub mod hash;
pub mod util;

mod error;

pub use error::PrimitivesError;
