use std::fmt;

use bytes::Buf;
use log::warn;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::DB_HEADER_SIZE;

/// Page type byte of a leaf table b-tree page.
pub const LEAF_TABLE_PAGE: u8 = 13;

/// Size of a leaf page header. Interior pages carry four more bytes, which
/// this reader never looks at.
pub const BTREE_HEADER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    pub page_type: u8,
    pub first_freeblock: u16,
    pub cell_count: u16,
    pub cell_content_area: u16,
    pub fragmented_free_bytes: u8,
}

impl PageHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < BTREE_HEADER_SIZE {
            return Err(Error::Format(format!(
                "page header needs {} bytes, got {}",
                BTREE_HEADER_SIZE,
                data.len()
            )));
        }

        let mut buf = &data[..BTREE_HEADER_SIZE];
        Ok(PageHeader {
            page_type: buf.get_u8(),
            first_freeblock: buf.get_u16(),
            cell_count: buf.get_u16(),
            cell_content_area: buf.get_u16(),
            fragmented_free_bytes: buf.get_u8(),
        })
    }

    pub fn is_leaf_table(&self) -> bool {
        self.page_type == LEAF_TABLE_PAGE
    }
}

/// Where the b-tree header starts inside a page. Page 1 carries the file header first.
pub fn page_header_offset(page_number: usize) -> usize {
    if page_number == 1 {
        DB_HEADER_SIZE
    } else {
        0
    }
}

/// Read `n_cells` big-endian cell offsets from the start of `data`.
///
/// `data` must begin right after the page header. Offsets are relative to the
/// start of the page and are returned in storage order.
pub fn read_cell_pointers(data: &[u8], n_cells: usize) -> Result<Vec<u16>> {
    let len = n_cells * 2;
    if len > data.len() {
        return Err(Error::Format(format!(
            "page too small to contain {} cell pointers",
            n_cells
        )));
    }

    let mut buf = &data[..len];
    let mut pointers = Vec::with_capacity(n_cells);
    while buf.has_remaining() {
        pointers.push(buf.get_u16());
    }
    Ok(pointers)
}

/// A page that has been read from disk along with its decoded header.
#[derive(Debug, Clone)]
pub struct Page {
    pub number: usize,
    pub data: Vec<u8>,
    pub header: PageHeader,
}

impl Page {
    pub fn new(number: usize, data: Vec<u8>) -> Result<Self> {
        let start = page_header_offset(number);
        let header = PageHeader::parse(data.get(start..).unwrap_or_default())?;
        Ok(Page {
            number,
            data,
            header,
        })
    }

    /// First byte after the page header, where the cell pointer array begins.
    pub fn header_end(&self) -> usize {
        page_header_offset(self.number) + BTREE_HEADER_SIZE
    }

    pub fn cell_pointers(&self) -> Result<Vec<u16>> {
        read_cell_pointers(
            &self.data[self.header_end()..],
            self.header.cell_count as usize,
        )
    }

    /// The bytes of the cell at `offset`, running to the end of the page.
    pub fn cell(&self, offset: u16) -> Result<&[u8]> {
        let offset = offset as usize;
        if offset < self.header_end() || offset >= self.data.len() {
            return Err(Error::decode(
                offset,
                format!(
                    "cell pointer outside [{}, {})",
                    self.header_end(),
                    self.data.len()
                ),
            ));
        }
        Ok(&self.data[offset..])
    }

    /// Decode the record stored at one cell pointer.
    pub fn decode_cell(&self, offset: u16) -> Result<Record> {
        Record::parse(self.cell(offset)?)
    }

    /// Decode every cell in `pointers`. A cell that fails to decode is left
    /// out of the records and reported as a diagnostic instead.
    pub fn decode_cells(&self, pointers: &[u16]) -> DecodedCells {
        let mut decoded = DecodedCells::default();
        for &offset in pointers {
            match self.decode_cell(offset) {
                Ok(record) => decoded.records.push(record),
                Err(error) => {
                    let diagnostic = CellDiagnostic {
                        page: self.number,
                        offset,
                        error,
                    };
                    warn!("page {}: {}", self.number, diagnostic);
                    decoded.diagnostics.push(diagnostic);
                }
            }
        }
        decoded
    }
}

/// A cell that was skipped because it could not be decoded.
#[derive(Debug)]
pub struct CellDiagnostic {
    pub page: usize,
    pub offset: u16,
    pub error: Error,
}

impl fmt::Display for CellDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error parsing cell at offset {}: {}", self.offset, self.error)
    }
}

#[derive(Debug, Default)]
pub struct DecodedCells {
    pub records: Vec<Record>,
    pub diagnostics: Vec<CellDiagnostic>,
}
