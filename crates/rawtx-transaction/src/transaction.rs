//! The transaction type and its wire encoding.
//!
//! ```text
//! version      u32 LE
//! input count  varint
//! inputs       txid(32, internal order) | vout u32 LE | script | sequence u32 LE
//! output count varint
//! outputs      value u64 LE | script
//! lock_time    u32 LE
//! ```
//!
//! Scripts are length-prefixed with a varint. The encoding is the same on
//! every platform, and parsing a serialization yields an equal value.

use rawtx_primitives::chainhash::Hash;
use rawtx_primitives::hash::sha256d;
use rawtx_primitives::util::{ByteReader, ByteWriter, VarInt};
use rawtx_primitives::PrimitivesError;
use rawtx_script::Script;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::sighash;
use crate::TransactionError;

/// Version written when none is configured.
pub const DEFAULT_VERSION: u32 = 1;

/// Lock time written when none is configured.
pub const DEFAULT_LOCK_TIME: u32 = 0;

/// Smallest encodings of an input (empty script) and of an output.
const MIN_INPUT_SIZE: usize = 41;
const MIN_OUTPUT_SIZE: usize = 9;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    /// Inputs, serialized in this order.
    pub inputs: Vec<TransactionInput>,
    /// Outputs, serialized in this order.
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

fn field_error(field: &'static str) -> impl Fn(PrimitivesError) -> TransactionError {
    move |e| TransactionError::SerializationError(format!("reading {}: {}", field, e))
}

impl Transaction {
    /// An empty transaction with the default version and lock time.
    pub fn new() -> Self {
        Transaction {
            version: DEFAULT_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: DEFAULT_LOCK_TIME,
        }
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::SerializationError(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse exactly one transaction; trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        match reader.remaining() {
            0 => Ok(tx),
            n => Err(TransactionError::SerializationError(format!(
                "{} unexpected bytes after lock time",
                n
            ))),
        }
    }

    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(field_error("version"))?;

        let n_inputs = reader.read_varint().map_err(field_error("input count"))?.value();
        // A hostile count must not drive the allocation.
        let mut inputs = Vec::with_capacity((n_inputs as usize).min(reader.remaining() / MIN_INPUT_SIZE));
        for _ in 0..n_inputs {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let n_outputs = reader.read_varint().map_err(field_error("output count"))?.value();
        let mut outputs = Vec::with_capacity((n_outputs as usize).min(reader.remaining() / MIN_OUTPUT_SIZE));
        for _ in 0..n_outputs {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(field_error("lock time"))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.size_hint());
        writer.write_u32_le(self.version);
        writer.write_varint(VarInt::from(self.inputs.len()));
        self.inputs.iter().for_each(|input| input.write_to(&mut writer));
        writer.write_varint(VarInt::from(self.outputs.len()));
        self.outputs.iter().for_each(|output| output.write_to(&mut writer));
        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Lowercase hex of [`to_bytes`](Self::to_bytes).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    /// Upper estimate of the serialized size, for buffer preallocation.
    pub(crate) fn size_hint(&self) -> usize {
        let unlocking: usize = self
            .inputs
            .iter()
            .filter_map(|input| input.unlocking_script.as_ref())
            .map(Script::len)
            .sum();
        let outputs: usize = self.outputs.iter().map(TransactionOutput::serialized_size).sum();
        10 + self.inputs.len() * MIN_INPUT_SIZE + unlocking + outputs
    }

    /// Double SHA-256 of the serialization, in internal byte order.
    pub fn tx_id(&self) -> [u8; 32] {
        sha256d(&self.to_bytes())
    }

    /// The txid as displayed by explorers and nodes (byte-reversed hex).
    pub fn tx_id_hex(&self) -> String {
        Hash::new(self.tx_id()).to_string()
    }

    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append an input spending `prev_tx_id:vout`, remembering the spent
    /// output's script and value so the input can be signed.
    pub fn add_input_from(
        &mut self,
        prev_tx_id: &str,
        vout: u32,
        prev_locking_script_hex: &str,
        satoshis: u64,
    ) -> Result<(), TransactionError> {
        let txid = Hash::from_hex(prev_tx_id)?;
        let locking_script = Script::from_hex(prev_locking_script_hex)?;

        let mut input = TransactionInput::new(&txid, vout);
        input.set_source_output(Some(TransactionOutput::new(satoshis, locking_script)));
        self.add_input(input);
        Ok(())
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Sum of the values of the outputs spent by the inputs.
    ///
    /// Fails if an input does not know the output it spends.
    pub fn total_input_satoshis(&self) -> Result<u64, TransactionError> {
        self.inputs.iter().try_fold(0u64, |total, input| {
            let value = input.source_tx_satoshis().ok_or_else(|| {
                TransactionError::InvalidTransaction("missing source output on input".to_string())
            })?;
            total
                .checked_add(value)
                .ok_or_else(|| TransactionError::InvalidTransaction("input value overflow".to_string()))
        })
    }

    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn total_output_satoshis(&self) -> u64 {
        self.outputs.iter().map(|output| output.satoshis).sum()
    }

    /// Legacy signature hash of input `input_index`, using the locking
    /// script of the output it spends as the script code.
    pub fn calc_input_signature_hash(
        &self,
        input_index: usize,
        sighash_flag: u32,
    ) -> Result<[u8; 32], TransactionError> {
        let input = self.inputs.get(input_index).ok_or_else(|| {
            TransactionError::InvalidTransaction(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                self.inputs.len()
            ))
        })?;
        let script_code = input.source_tx_script().ok_or_else(|| {
            TransactionError::SigningError(format!(
                "input {} has no source output to sign against",
                input_index
            ))
        })?;

        sighash::signature_hash(self, input_index, script_code.to_bytes(), sighash_flag)
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
