use std::fmt;

use crate::error::{Error, Result};
use crate::varint::read_varint_strict;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Null,          // 0, 10, 11
    Int(i64),      // 1-6, 8, 9
    Float(f64),    // 7
    Blob(Vec<u8>), // N >= 12 and even
    Text(String),  // N >= 13 and odd
    /// A text column whose bytes are not valid UTF-8, kept exactly as stored.
    RawText(Vec<u8>),
}

/// Number of payload bytes a column of the given serial type occupies.
pub fn content_size(serial_type: u64) -> usize {
    match serial_type {
        0 | 8..=11 => 0,
        1..=4 => serial_type as usize,
        5 => 6,
        6 | 7 => 8,
        n if n % 2 == 0 => ((n - 12) / 2) as usize,
        n => ((n - 13) / 2) as usize,
    }
}

impl RecordValue {
    /// Decode the column at `offset` and return it with the number of bytes consumed.
    pub fn from_serial_type(serial_type: u64, data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let size = content_size(serial_type);
        let bytes = offset
            .checked_add(size)
            .and_then(|end| data.get(offset..end))
            .ok_or_else(|| {
                Error::decode(
                    offset,
                    format!("serial type {} needs {} bytes past the payload end", serial_type, size),
                )
            })?;

        let value = match serial_type {
            0 | 10 | 11 => RecordValue::Null,
            1 => RecordValue::Int(bytes[0] as i8 as i64),
            2..=6 => RecordValue::Int(read_int(bytes)),
            7 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                RecordValue::Float(f64::from_be_bytes(raw))
            }
            8 => RecordValue::Int(0),
            9 => RecordValue::Int(1),
            n if n % 2 == 0 => RecordValue::Blob(bytes.to_vec()),
            _ => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => RecordValue::Text(text),
                Err(err) => RecordValue::RawText(err.into_bytes()),
            },
        };
        Ok((value, size))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordValue::Int(value) => Some(*value),
            _ => None,
        }
    }
}

/// Big-endian two's-complement integer of 1 to 8 bytes.
fn read_int(bytes: &[u8]) -> i64 {
    let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut padded = [fill; 8];
    padded[8 - bytes.len()..].copy_from_slice(bytes);
    i64::from_be_bytes(padded)
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Null => Ok(()),
            RecordValue::Int(i) => write!(f, "{}", i),
            RecordValue::Float(x) => write!(f, "{}", x),
            RecordValue::Text(s) => f.write_str(s),
            RecordValue::Blob(b) | RecordValue::RawText(b) => {
                f.write_str(&String::from_utf8_lossy(b))
            }
        }
    }
}

/// One decoded table b-tree leaf cell: its rowid and the record stored in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub payload_len: u64,
    pub rowid: u64,
    pub header_len: u64,
    pub serial_types: Vec<u64>,
    pub values: Vec<RecordValue>,
}

impl Record {
    /// Decode a cell starting at the first byte of `data`.
    ///
    /// Error offsets are relative to the start of the cell.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut pos = 0;
        let (payload_len, bytes_read) = read_varint_strict(data, pos)?;
        pos += bytes_read as usize;
        let (rowid, bytes_read) = read_varint_strict(data, pos)?;
        pos += bytes_read as usize;

        let payload_end = usize::try_from(payload_len)
            .ok()
            .and_then(|len| pos.checked_add(len))
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                Error::decode(
                    pos,
                    format!("payload of {} bytes runs past the page", payload_len),
                )
            })?;
        let payload = &data[..payload_end];

        let header_start = pos;
        let (header_len, bytes_read) = read_varint_strict(payload, pos)?;
        pos += bytes_read as usize;

        let header_end = usize::try_from(header_len)
            .ok()
            .filter(|&len| len >= bytes_read as usize)
            .and_then(|len| header_start.checked_add(len))
            .filter(|&end| end <= payload_end)
            .ok_or_else(|| {
                Error::decode(
                    header_start,
                    format!("record header length {} out of range", header_len),
                )
            })?;

        // Slicing at header_end turns a serial type that overruns the header into an error.
        let header = &payload[..header_end];
        let mut serial_types = Vec::new();
        while pos < header_end {
            let (serial_type, bytes_read) = read_varint_strict(header, pos)?;
            pos += bytes_read as usize;
            serial_types.push(serial_type);
        }

        let mut values = Vec::with_capacity(serial_types.len());
        for &serial_type in &serial_types {
            let (value, size) = RecordValue::from_serial_type(serial_type, payload, pos)?;
            values.push(value);
            pos += size;
        }

        Ok(Record {
            payload_len,
            rowid,
            header_len,
            serial_types,
            values,
        })
    }
}
