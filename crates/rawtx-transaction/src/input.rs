//! Inputs: the outpoint being spent plus its unlocking script.
//!
//! ```text
//! txid (32, wire order) | vout (u32 LE) | varint len | script | sequence (u32 LE)
//! ```

use rawtx_primitives::chainhash::Hash;
use rawtx_primitives::util::{ByteReader, ByteWriter};
use rawtx_primitives::PrimitivesError;
use rawtx_script::Script;

use crate::output::TransactionOutput;
use crate::TransactionError;

/// Final sequence: no relative lock, no replacement.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// Outpoint and sequence, everything except the script.
pub const INPUT_FIXED_SIZE: usize = 32 + 4 + 4;

/// Equality covers the serialized fields only.
#[derive(Clone, Debug)]
pub struct TransactionInput {
    /// Wire byte order, i.e. the reverse of the displayed txid.
    pub source_txid: [u8; 32],
    pub source_tx_out_index: u32,
    pub sequence_number: u32,
    /// `None` until signed. An empty script on the wire also reads as `None`.
    pub unlocking_script: Option<Script>,
    /// Output being spent, kept for signing. Never serialized.
    source_output: Option<TransactionOutput>,
}

impl PartialEq for TransactionInput {
    fn eq(&self, other: &Self) -> bool {
        self.source_txid == other.source_txid
            && self.source_tx_out_index == other.source_tx_out_index
            && self.sequence_number == other.sequence_number
            && self.unlocking_script == other.unlocking_script
    }
}

impl Eq for TransactionInput {}

fn wire_error(field: &'static str) -> impl Fn(PrimitivesError) -> TransactionError {
    move |e| TransactionError::SerializationError(format!("input {field}: {e}"))
}

impl TransactionInput {
    pub fn new(source_txid: &Hash, vout: u32) -> Self {
        TransactionInput {
            source_txid: *source_txid.as_bytes(),
            source_tx_out_index: vout,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: None,
            source_output: None,
        }
    }

    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let txid = reader.read_bytes(32).map_err(wire_error("txid"))?;
        let outpoint = Hash::from_bytes(txid)?;
        let vout = reader.read_u32_le().map_err(wire_error("vout"))?;
        let len = reader.read_varint().map_err(wire_error("script length"))?;
        let script = reader
            .read_bytes(len.value() as usize)
            .map_err(wire_error("script"))?;
        let sequence = reader.read_u32_le().map_err(wire_error("sequence"))?;

        let mut input = TransactionInput::new(&outpoint, vout);
        input.sequence_number = sequence;
        input.unlocking_script = (!script.is_empty()).then(|| Script::from_bytes(script));
        Ok(input)
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        let script = self
            .unlocking_script
            .as_ref()
            .map(Script::to_bytes)
            .unwrap_or_default();
        self.write_with_script(writer, script, self.sequence_number);
    }

    /// Writes the outpoint with `script` and `sequence` in place of this
    /// input's own, as sighash preimages require.
    pub(crate) fn write_with_script(&self, writer: &mut ByteWriter, script: &[u8], sequence: u32) {
        writer.write_bytes(&self.source_txid);
        writer.write_u32_le(self.source_tx_out_index);
        writer.write_var_bytes(script);
        writer.write_u32_le(sequence);
    }

    /// Display-order txid.
    pub fn source_txid_hex(&self) -> String {
        Hash::new(self.source_txid).to_string()
    }

    pub fn is_signed(&self) -> bool {
        matches!(&self.unlocking_script, Some(s) if !s.is_empty())
    }

    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    pub fn source_tx_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }

    pub fn source_tx_satoshis(&self) -> Option<u64> {
        self.source_tx_output().map(|o| o.satoshis)
    }

    pub fn source_tx_script(&self) -> Option<&Script> {
        self.source_tx_output().map(|o| &o.locking_script)
    }
}
