//! Legacy signature hash computation.
//!
//! Computes the digest signed by ECDSA to authorize spending an input under
//! the pre-segwit whole-transaction scheme: a modified copy of the transaction
//! is serialized with the script code in place of the signed input's
//! scriptSig, the 4-byte sighash type is appended, and the result is
//! double-SHA256 hashed.
//!
//! The script code is committed as given; OP_CODESEPARATOR is not stripped.

use rawtx_primitives::hash::sha256d;
use rawtx_primitives::util::{ByteWriter, VarInt};

use crate::input::TransactionInput;
use crate::transaction::Transaction;
use crate::TransactionError;

// Base types, selected by the low five bits.
pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_NONE: u32 = 0x02;
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Modifier: commit to the signed input only.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

pub const SIGHASH_MASK: u32 = 0x1f;

/// Digest returned for SIGHASH_SINGLE when the input has no matching output.
///
/// This is the integer 1 in internal byte order.
pub const SIGHASH_SINGLE_NO_OUTPUT: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

/// Digest that input `input_index` signs.
///
/// `script_code` is the spent output's locking script, or the redeem script
/// when spending P2SH. SIGHASH_SINGLE without a matching output yields
/// [`SIGHASH_SINGLE_NO_OUTPUT`] instead of an error.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    check_index(tx, input_index)?;

    if sighash_type & SIGHASH_MASK == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return Ok(SIGHASH_SINGLE_NO_OUTPUT);
    }

    let preimage = calc_preimage(tx, input_index, script_code, sighash_type)?;
    Ok(sha256d(&preimage))
}

/// Compute the pre-image bytes for the legacy sighash before double-hashing.
///
/// The preimage is the transaction serialized with these substitutions:
/// 1. Every scriptSig is emptied, except the signed input's, which is
///    replaced by `script_code`.
/// 2. ANYONECANPAY: only the signed input is serialized.
/// 3. NONE: no outputs; other inputs' sequence numbers are zeroed.
/// 4. SINGLE: outputs up to and including `input_index`, earlier ones
///    blanked to value -1 with an empty script; other inputs' sequence
///    numbers are zeroed.
///
/// followed by the sighash type as 4 bytes little-endian.
///
/// # Returns
/// The raw preimage bytes, or an error if the input index is out of range or
/// SIGHASH_SINGLE has no matching output.
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    check_index(tx, input_index)?;

    let base_type = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    if base_type == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "SIGHASH_SINGLE input {} has no matching output (tx has {} outputs)",
            input_index,
            tx.outputs.len()
        )));
    }

    let mut writer = ByteWriter::with_capacity(tx.size_hint() + script_code.len() + 4);
    writer.write_u32_le(tx.version);

    let blank_sequence = matches!(base_type, SIGHASH_NONE | SIGHASH_SINGLE);
    let signed: Vec<(usize, &TransactionInput)> = if anyone_can_pay {
        vec![(input_index, &tx.inputs[input_index])]
    } else {
        tx.inputs.iter().enumerate().collect()
    };
    writer.write_varint(VarInt::from(signed.len()));
    for (i, input) in signed {
        if i == input_index {
            input.write_with_script(&mut writer, script_code, input.sequence_number);
        } else {
            let sequence = if blank_sequence { 0 } else { input.sequence_number };
            input.write_with_script(&mut writer, &[], sequence);
        }
    }

    // Outputs
    match base_type {
        SIGHASH_NONE => writer.write_varint(VarInt(0)),
        SIGHASH_SINGLE => {
            writer.write_varint(VarInt::from(input_index + 1));
            for _ in 0..input_index {
                writer.write_u64_le(u64::MAX);
                writer.write_var_bytes(&[]);
            }
            tx.outputs[input_index].write_to(&mut writer);
        }
        _ => {
            writer.write_varint(VarInt::from(tx.outputs.len()));
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
    }

    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);

    Ok(writer.into_bytes())
}

fn check_index(tx: &Transaction, input_index: usize) -> Result<(), TransactionError> {
    if input_index < tx.inputs.len() {
        return Ok(());
    }
    Err(TransactionError::InvalidTransaction(format!(
        "input index {input_index} out of range (tx has {} inputs)",
        tx.inputs.len()
    )))
}
