use log::debug;

use crate::page::{CellDiagnostic, Page};
use crate::record::{Record, RecordValue};

/// One row of the schema table: a table, index, view or trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub object_type: String, // "table", "index", "view", etc.
    pub name: String,
    pub tbl_name: String,    // table this object belongs to
    pub rootpage: Option<u64>,
    pub sql: Option<String>, // CREATE statement
}

impl SchemaEntry {
    /// Schema rows have exactly five columns: type, name, tbl_name, rootpage, sql.
    pub fn from_record(record: &Record) -> Option<Self> {
        let [object_type, name, tbl_name, rootpage, sql] = record.values.as_slice() else {
            return None;
        };

        Some(SchemaEntry {
            object_type: object_type.to_string(),
            name: name.to_string(),
            tbl_name: tbl_name.to_string(),
            rootpage: rootpage.as_int().and_then(|page| u64::try_from(page).ok()),
            sql: match sql {
                RecordValue::Null => None,
                other => Some(other.to_string()),
            },
        })
    }

    pub fn is_table(&self) -> bool {
        self.object_type == "table"
    }
}

/// Every schema entry of the database, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<SchemaEntry>,
}

impl Catalog {
    /// Build the catalog from the cells of the schema page. Cells that fail to
    /// decode are skipped and returned as diagnostics; rows that are not
    /// five columns wide are ignored.
    pub fn build(page: &Page, cell_pointers: &[u16]) -> (Self, Vec<CellDiagnostic>) {
        let decoded = page.decode_cells(cell_pointers);

        let mut catalog = Catalog::default();
        for entry in decoded.records.iter().filter_map(SchemaEntry::from_record) {
            debug!(
                "schema entry: {} {} (root page {:?})",
                entry.object_type, entry.name, entry.rootpage
            );
            catalog.insert(entry);
        }

        (catalog, decoded.diagnostics)
    }

    /// Add an entry, replacing any earlier entry with the same name in place.
    pub fn insert(&mut self, entry: SchemaEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Names of the entries whose type is "table", in catalog order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.is_table())
            .map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<SchemaEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = SchemaEntry>>(iter: I) -> Self {
        let mut catalog = Catalog::default();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}
