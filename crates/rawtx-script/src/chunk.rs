//! Splitting scripts into opcodes and pushes, and choosing push prefixes.

use crate::opcodes::*;
use crate::ScriptError;

/// One opcode of a script, with its payload when the opcode pushes data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// For direct pushes this is the payload length (1..=75).
    pub op: u8,
    pub data: Option<Vec<u8>>,
}

/// Splits `bytes` into chunks.
///
/// An OP_RETURN outside any IF block ends parsing and its chunk carries
/// every remaining byte (itself included) as data.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut rest = bytes;
    let mut depth = 0i32;

    while let Some(&op) = rest.first() {
        match op {
            OP_IF | OP_NOTIF | OP_VERIF | OP_VERNOTIF => depth += 1,
            OP_ENDIF => depth -= 1,
            OP_RETURN if depth <= 0 => {
                chunks.push(ScriptChunk {
                    op,
                    data: Some(rest.to_vec()),
                });
                break;
            }
            _ => {}
        }
        let (chunk, tail) = split_chunk(rest)?;
        chunks.push(chunk);
        rest = tail;
    }

    Ok(chunks)
}

/// Takes the leading chunk off a non-empty slice.
fn split_chunk(bytes: &[u8]) -> Result<(ScriptChunk, &[u8]), ScriptError> {
    let (&op, body) = bytes.split_first().ok_or(ScriptError::DataTooSmall)?;
    let width = match op {
        OP_DATA_1..=OP_DATA_75 => 0,
        OP_PUSHDATA1 => 1,
        OP_PUSHDATA2 => 2,
        OP_PUSHDATA4 => 4,
        _ => return Ok((ScriptChunk { op, data: None }, body)),
    };

    let len = if width == 0 {
        op as usize
    } else {
        let field = body.get(..width).ok_or(ScriptError::DataTooSmall)?;
        field
            .iter()
            .rev()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize)
    };
    let body = &body[width..];
    if len > body.len() {
        return Err(ScriptError::DataTooSmall);
    }
    let (data, tail) = body.split_at(len);
    Ok((
        ScriptChunk {
            op,
            data: Some(data.to_vec()),
        },
        tail,
    ))
}

/// Smallest push prefix for a payload of `data_len` bytes.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    let len = u32::try_from(data_len).map_err(|_| ScriptError::DataTooBig)?;
    let prefix = match len {
        0..=0x4b => vec![len as u8],
        0x4c..=0xff => vec![OP_PUSHDATA1, len as u8],
        0x100..=0xffff => {
            let [a, b] = (len as u16).to_le_bytes();
            vec![OP_PUSHDATA2, a, b]
        }
        _ => {
            let mut prefix = vec![OP_PUSHDATA4];
            prefix.extend_from_slice(&len.to_le_bytes());
            prefix
        }
    };
    Ok(prefix)
}
