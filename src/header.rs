use bytes::Buf;

use crate::error::{Error, Result};

/// The header string every database file starts with: "SQLite format 3\0".
pub const MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Bytes actually decoded from the 100-byte file header.
const DECODED_LEN: usize = 21;

/// File-level metadata stored in the first 100 bytes of the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHeader {
    pub magic: [u8; 16],
    /// Page size exactly as stored. `1` stands for 65536.
    pub raw_page_size: u16,
    pub write_version: u8,
    pub read_version: u8,
    pub reserved_bytes: u8,
}

impl DatabaseHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < DECODED_LEN {
            return Err(Error::Format(format!(
                "file header needs at least {} bytes, got {}",
                DECODED_LEN,
                data.len()
            )));
        }

        let mut buf = &data[..DECODED_LEN];
        let mut magic = [0u8; 16];
        buf.copy_to_slice(&mut magic);

        Ok(DatabaseHeader {
            magic,
            raw_page_size: buf.get_u16(),
            write_version: buf.get_u8(),
            read_version: buf.get_u8(),
            reserved_bytes: buf.get_u8(),
        })
    }

    /// The database page size in bytes.
    pub fn page_size(&self) -> usize {
        match self.raw_page_size {
            1 => 65536,
            n => n as usize,
        }
    }

    /// Checks the magic string and that the page size is a power of two
    /// between 512 and 65536 inclusive.
    pub fn validate(&self) -> Result<()> {
        if &self.magic != MAGIC {
            return Err(Error::Format(format!(
                "bad magic string {:?}",
                String::from_utf8_lossy(&self.magic)
            )));
        }
        let page_size = self.page_size();
        if !page_size.is_power_of_two() || !(512..=65536).contains(&page_size) {
            return Err(Error::Format(format!("invalid page size {}", page_size)));
        }
        Ok(())
    }
}
