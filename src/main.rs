use anyhow::Result;
use clap::Parser;
use log::info;
use sqlite_peek::{execute_command, Error};

#[derive(Parser)]
#[command(version, about = "Inspect a SQLite database file", long_about = None)]
struct Args {
    /// Path to the database file
    database_path: String,
    /// `.dbinfo`, `.tables`, `select count(*) from <table>` or `select <columns> from <table>`
    command: String,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();
    info!("running {:?} against {}", args.command, args.database_path);

    match execute_command(&args.database_path, &args.command) {
        Err(err) if matches!(err.downcast_ref::<Error>(), Some(Error::TableNotFound(_))) => {
            println!("{}", err);
            std::process::exit(1);
        }
        other => other,
    }
}
