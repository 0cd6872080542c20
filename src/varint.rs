use crate::error::{Error, Result};

/// Longest encoding: eight 7-bit groups followed by one full byte.
pub const MAX_VARINT_LEN: usize = 9;

/// Read a variable-length integer from the given data at the specified offset
/// Returns (value, bytes_read)
///
/// Input that ends before the varint terminates yields whatever was
/// accumulated so far. Use [`read_varint_strict`] where that must be an error.
pub fn read_varint(data: &[u8], offset: usize) -> Result<(u64, u8)> {
    let (value, bytes_read, _) = decode(data, offset)?;
    Ok((value, bytes_read))
}

/// Like [`read_varint`], but a varint clipped by the end of `data` is a decode error.
pub fn read_varint_strict(data: &[u8], offset: usize) -> Result<(u64, u8)> {
    let (value, bytes_read, terminated) = decode(data, offset)?;
    if !terminated {
        return Err(Error::decode(
            offset,
            format!("varint truncated after {} bytes", bytes_read),
        ));
    }
    Ok((value, bytes_read))
}

fn decode(data: &[u8], offset: usize) -> Result<(u64, u8, bool)> {
    let available = data
        .get(offset..)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| Error::decode(offset, "not enough data to read varint"))?;

    let mut value: u64 = 0;
    for (i, &byte) in available.iter().take(MAX_VARINT_LEN).enumerate() {
        let bytes_read = i as u8 + 1;
        if i == MAX_VARINT_LEN - 1 {
            // 9th byte: take all 8 bits
            return Ok(((value << 8) | byte as u64, bytes_read, true));
        }
        // High-order group comes first → shift before OR'ing
        value = (value << 7) | (byte & 0x7F) as u64;
        if byte & 0x80 == 0 {
            return Ok((value, bytes_read, true));
        }
    }

    Ok((value, available.len() as u8, false))
}
