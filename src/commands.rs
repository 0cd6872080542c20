use std::io::{self, Read, Seek, Write};

use anyhow::Result;
use log::debug;

use crate::page::CellDiagnostic;
use crate::Database;

/// The command shapes understood on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    DbInfo,
    Tables,
    Count { table: String },
    /// The column list is kept as written but every column is printed.
    Select { columns: String, table: String },
    Invalid(String),
}

impl Command {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            ".dbinfo" => Command::DbInfo,
            ".tables" => Command::Tables,
            query => {
                Self::parse_select(query).unwrap_or_else(|| Command::Invalid(text.to_string()))
            }
        }
    }

    /// `select <columns> from <table>`, keywords in any case.
    fn parse_select(query: &str) -> Option<Self> {
        let parts: Vec<&str> = query.trim_end_matches(';').split_whitespace().collect();
        if !parts.first()?.eq_ignore_ascii_case("select") {
            return None;
        }

        let from_pos = parts.iter().position(|part| part.eq_ignore_ascii_case("from"))?;
        // exactly one table name after FROM and at least one column before it
        if from_pos < 2 || parts.len() != from_pos + 2 {
            return None;
        }

        let columns = parts[1..from_pos].join(" ");
        let table = parts[from_pos + 1].to_string();
        if columns.eq_ignore_ascii_case("count(*)") {
            Some(Command::Count { table })
        } else {
            Some(Command::Select { columns, table })
        }
    }
}

/// Run one command against an open database, writing its output to `out`.
///
/// Returns the cells that were skipped because they could not be decoded.
pub fn execute<R: Read + Seek, W: Write>(
    db: &mut Database<R>,
    command: &Command,
    out: &mut W,
) -> crate::Result<Vec<CellDiagnostic>> {
    debug!("executing {:?}", command);
    match command {
        Command::DbInfo => {
            let header = db.header();
            writeln!(out, "database page size: {}", header.page_size())?;
            writeln!(out, "write version: {}", header.write_version)?;
            writeln!(out, "read version: {}", header.read_version)?;
            writeln!(out, "reserved bytes: {}", header.reserved_bytes)?;
            // raw cell count of the schema page, indexes and views included
            writeln!(out, "number of tables: {}", db.schema_page().header.cell_count)?;
        }
        Command::Tables => {
            let names: Vec<&str> = db.catalog().table_names().collect();
            writeln!(out, "{}", names.join(" "))?;
        }
        Command::Count { table } => {
            writeln!(out, "{}", db.count_table_rows(table)?)?;
        }
        Command::Select { table, .. } => {
            let table_rows = db.get_table_rows(table)?;
            for row in &table_rows.rows {
                let values: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
                writeln!(out, "{}", values.join("|"))?;
            }
            return Ok(table_rows.diagnostics);
        }
        Command::Invalid(text) => {
            writeln!(out, "Invalid command: {}", text)?;
        }
    }
    Ok(Vec::new())
}

pub fn execute_command(database_path: &str, command: &str) -> Result<()> {
    let mut db = Database::open(database_path)?;
    report(db.diagnostics());

    let command = Command::parse(command);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let skipped = execute(&mut db, &command, &mut out)?;
    report(&skipped);

    Ok(())
}

fn report(diagnostics: &[CellDiagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
}
