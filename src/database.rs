use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::header::DatabaseHeader;
use crate::page::{CellDiagnostic, Page};
use crate::record::Record;
use crate::schema::{Catalog, SchemaEntry};
use crate::DB_HEADER_SIZE;

/// Rows decoded from a table's root page plus any cells that were skipped.
#[derive(Debug)]
pub struct TableRows {
    pub rows: Vec<Record>,
    pub diagnostics: Vec<CellDiagnostic>,
}

/// An open database file with its header, schema page and catalog already read.
pub struct Database<R = File> {
    reader: R,
    header: DatabaseHeader,
    schema_page: Page,
    catalog: Catalog,
    diagnostics: Vec<CellDiagnostic>,
}

impl Database<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("opening {}", path.display());
        Self::from_reader(File::open(path)?)
    }
}

impl<R: Read + Seek> Database<R> {
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let header = Self::read_header(&mut reader)?;
        header.validate()?;
        debug!(
            "page size {}, write version {}, read version {}",
            header.page_size(),
            header.write_version,
            header.read_version
        );

        let schema_page = read_page(&mut reader, header.page_size(), 1)?;
        let pointers = schema_page.cell_pointers()?;
        let (catalog, diagnostics) = Catalog::build(&schema_page, &pointers);

        Ok(Database {
            reader,
            header,
            schema_page,
            catalog,
            diagnostics,
        })
    }

    fn read_header(reader: &mut R) -> Result<DatabaseHeader> {
        reader.seek(SeekFrom::Start(0))?;
        let mut header = [0; DB_HEADER_SIZE];
        reader.read_exact(&mut header).map_err(|err| match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::Format("file is shorter than the 100-byte header".to_string())
            }
            _ => Error::Io(err),
        })?;
        DatabaseHeader::parse(&header)
    }

    pub fn header(&self) -> &DatabaseHeader {
        &self.header
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn schema_page(&self) -> &Page {
        &self.schema_page
    }

    /// Cells of the schema page that could not be decoded.
    pub fn diagnostics(&self) -> &[CellDiagnostic] {
        &self.diagnostics
    }

    pub fn read_page(&mut self, page_number: usize) -> Result<Page> {
        read_page(&mut self.reader, self.header.page_size(), page_number)
    }

    fn find_table(&self, table_name: &str) -> Result<&SchemaEntry> {
        self.catalog
            .get(table_name)
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))
    }

    /// Read the root page of `table_name`, whatever its page type.
    pub fn table_root_page(&mut self, table_name: &str) -> Result<Page> {
        let entry = self.find_table(table_name)?;
        let page_number = entry
            .rootpage
            .and_then(|page| usize::try_from(page).ok())
            .filter(|&page| page > 0)
            .ok_or_else(|| Error::InvalidRootPage(table_name.to_string()))?;

        self.read_page(page_number)
    }

    /// The cell count from the root page header. Only a row count when the
    /// whole table fits on that one page.
    pub fn count_table_rows(&mut self, table_name: &str) -> Result<usize> {
        let page = self.table_root_page(table_name)?;
        Ok(page.header.cell_count as usize)
    }

    /// Decode every row on the root page, which must be a leaf table page.
    pub fn get_table_rows(&mut self, table_name: &str) -> Result<TableRows> {
        let page = self.table_root_page(table_name)?;
        if !page.header.is_leaf_table() {
            return Err(Error::UnsupportedPage {
                page: page.number,
                page_type: page.header.page_type,
            });
        }
        let pointers = page.cell_pointers()?;
        let decoded = page.decode_cells(&pointers);
        Ok(TableRows {
            rows: decoded.records,
            diagnostics: decoded.diagnostics,
        })
    }
}

/// Seek to the start of `page_number` and read exactly one page.
fn read_page<R: Read + Seek>(reader: &mut R, page_size: usize, page_number: usize) -> Result<Page> {
    let index = page_number
        .checked_sub(1)
        .ok_or_else(|| Error::Format("page numbers start at 1".to_string()))?;
    let offset = index as u64 * page_size as u64;
    debug!("reading page {} at byte {}", page_number, offset);
    reader.seek(SeekFrom::Start(offset))?;

    let mut page_data = vec![0; page_size];
    reader.read_exact(&mut page_data)?;
    Page::new(page_number, page_data)
}
