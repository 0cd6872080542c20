#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

pub const PAGE_SIZE: usize = 4096;

/// A column value as it is written into a test record.
pub enum Column<'a> {
    Null,
    Int8(i8),
    Text(&'a str),
    /// Arbitrary serial type with its payload bytes.
    Raw(u64, &'a [u8]),
}

pub fn encode_varint(mut value: u64) -> Vec<u8> {
    if value > 0x00FF_FFFF_FFFF_FFFF {
        let last = value as u8;
        value >>= 8;
        let mut out: Vec<u8> = (0..8)
            .rev()
            .map(|group| ((value >> (7 * group)) & 0x7F) as u8 | 0x80)
            .collect();
        out.push(last);
        return out;
    }
    let mut groups = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    groups.reverse();
    groups
}

/// A table leaf cell: payload length, rowid, record header and body.
pub fn record_cell(rowid: u64, columns: &[Column]) -> Vec<u8> {
    let mut types = Vec::new();
    let mut body = Vec::new();
    for column in columns {
        let (serial_type, bytes): (u64, Vec<u8>) = match column {
            Column::Null => (0, Vec::new()),
            Column::Int8(value) => (1, vec![*value as u8]),
            Column::Text(text) => (text.len() as u64 * 2 + 13, text.as_bytes().to_vec()),
            Column::Raw(serial_type, bytes) => (*serial_type, bytes.to_vec()),
        };
        types.extend(encode_varint(serial_type));
        body.extend(bytes);
    }

    // header length counts its own varint
    let mut header_len = types.len() as u64 + 1;
    if encode_varint(header_len).len() > 1 {
        header_len += 1;
    }

    let mut payload = encode_varint(header_len);
    payload.extend(types);
    payload.extend(body);

    let mut cell = encode_varint(payload.len() as u64);
    cell.extend(encode_varint(rowid));
    cell.extend(payload);
    cell
}

pub fn schema_row(rowid: u64, object_type: &str, name: &str, rootpage: i8, sql: &str) -> Vec<u8> {
    record_cell(
        rowid,
        &[
            Column::Text(object_type),
            Column::Text(name),
            Column::Text(name),
            Column::Int8(rootpage),
            Column::Text(sql),
        ],
    )
}

/// A leaf table page holding `cells`, packed against the end of the page.
pub fn leaf_page(page_number: usize, cells: &[Vec<u8>]) -> Vec<u8> {
    page_with_type(page_number, 13, cells)
}

pub fn page_with_type(page_number: usize, page_type: u8, cells: &[Vec<u8>]) -> Vec<u8> {
    let start = if page_number == 1 { 100 } else { 0 };
    let mut page = vec![0u8; PAGE_SIZE];
    let mut content = PAGE_SIZE;
    let mut pointers = Vec::new();
    for cell in cells {
        content -= cell.len();
        page[content..content + cell.len()].copy_from_slice(cell);
        pointers.extend_from_slice(&(content as u16).to_be_bytes());
    }

    page[start] = page_type;
    page[start + 3..start + 5].copy_from_slice(&(cells.len() as u16).to_be_bytes());
    page[start + 5..start + 7].copy_from_slice(&(content as u16).to_be_bytes());
    page[start + 8..start + 8 + pointers.len()].copy_from_slice(&pointers);
    page
}

/// Concatenate pages into a database file, stamping the file header onto page 1.
pub fn database_file(pages: &[Vec<u8>]) -> Vec<u8> {
    let mut data: Vec<u8> = pages.concat();
    data[..16].copy_from_slice(b"SQLite format 3\0");
    data[16..18].copy_from_slice(&(PAGE_SIZE as u16).to_be_bytes());
    data[18] = 1;
    data[19] = 1;
    data[20] = 0;
    data
}

pub fn write_temp(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

/// Schema with tables `a` (page 2, seven rows) and `b` (page 4, three rows)
/// and an index `idx_a` on page 3.
pub fn sample_database() -> Vec<u8> {
    let schema = leaf_page(
        1,
        &[
            schema_row(1, "table", "a", 2, "CREATE TABLE a (id integer primary key, n integer)"),
            schema_row(2, "index", "idx_a", 3, "CREATE INDEX idx_a ON a (n)"),
            schema_row(3, "table", "b", 4, "CREATE TABLE b (id integer primary key, name text, qty integer)"),
        ],
    );

    let a_rows: Vec<Vec<u8>> = (1..=7)
        .map(|i| record_cell(i, &[Column::Null, Column::Int8(i as i8 * 10)]))
        .collect();
    let a = leaf_page(2, &a_rows);

    let idx_a = page_with_type(3, 10, &[]);

    let b = leaf_page(
        4,
        &[
            record_cell(1, &[Column::Null, Column::Text("apple"), Column::Int8(3)]),
            record_cell(2, &[Column::Null, Column::Text("pear"), Column::Int8(-1)]),
            record_cell(3, &[Column::Null, Column::Text("fig"), Column::Null]),
        ],
    );

    database_file(&[schema, a, idx_a, b])
}
