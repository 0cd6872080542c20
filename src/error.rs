use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File header or page header could not be read. Fatal for the run.
    #[error("malformed database: {0}")]
    Format(String),

    /// A single cell could not be decoded. Callers skip the cell.
    #[error("cannot decode cell at offset {offset}: {reason}")]
    Decode { offset: usize, reason: String },

    #[error("Table not found")]
    TableNotFound(String),

    #[error("page {page} has type {page_type}, only leaf table pages can be read")]
    UnsupportedPage { page: usize, page_type: u8 },

    #[error("table {0} has no usable root page")]
    InvalidRootPage(String),
}

impl Error {
    pub(crate) fn decode(offset: usize, reason: impl Into<String>) -> Self {
        Error::Decode {
            offset,
            reason: reason.into(),
        }
    }
}
