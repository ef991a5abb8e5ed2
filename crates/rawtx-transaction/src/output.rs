use rawtx_primitives::util::{ByteReader, ByteWriter, VarInt};
use rawtx_primitives::PrimitivesError;
use rawtx_script::Script;

use crate::TransactionError;

/// `satoshis` (u64 LE) then the var-length locking script.
///
/// `change` marks the output that returns value to the sender. It is
/// bookkeeping only: it never reaches the wire and is ignored by equality.
#[derive(Clone, Debug, Default)]
pub struct TransactionOutput {
    pub satoshis: u64,
    pub locking_script: Script,
    pub change: bool,
}

impl PartialEq for TransactionOutput {
    fn eq(&self, other: &Self) -> bool {
        self.satoshis == other.satoshis && self.locking_script == other.locking_script
    }
}

impl Eq for TransactionOutput {}

impl TransactionOutput {
    pub fn new(satoshis: u64, locking_script: Script) -> Self {
        TransactionOutput {
            satoshis,
            locking_script,
            change: false,
        }
    }

    pub fn new_change(satoshis: u64, locking_script: Script) -> Self {
        TransactionOutput {
            change: true,
            ..Self::new(satoshis, locking_script)
        }
    }

    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let wire = |what: &'static str| {
            move |e: PrimitivesError| {
                TransactionError::SerializationError(format!("output {what}: {e}"))
            }
        };
        let satoshis = reader.read_u64_le().map_err(wire("value"))?;
        let len = reader.read_varint().map_err(wire("script length"))?.value();
        let script = reader.read_bytes(len as usize).map_err(wire("script"))?;
        Ok(TransactionOutput::new(satoshis, Script::from_bytes(script)))
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.satoshis);
        writer.write_var_bytes(self.locking_script.to_bytes());
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    pub fn serialized_size(&self) -> usize {
        let len = self.locking_script.len();
        8 + VarInt::from(len).length() + len
    }

    pub fn locking_script_hex(&self) -> String {
        self.locking_script.to_hex()
    }
}
