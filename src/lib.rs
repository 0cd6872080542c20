pub mod commands;
pub mod database;
pub mod error;
pub mod header;
pub mod page;
pub mod record;
pub mod schema;
pub mod varint;

// Common constants
pub const DB_HEADER_SIZE: usize = 100;

// Re-export main types for convenience
pub use commands::{execute, execute_command, Command};
pub use database::{Database, TableRows};
pub use error::{Error, Result};
pub use header::DatabaseHeader;
pub use page::{CellDiagnostic, Page, PageHeader};
pub use record::{Record, RecordValue};
pub use schema::{Catalog, SchemaEntry};
