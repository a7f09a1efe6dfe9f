use serde_json::Value;
use simple_crud::config::{self, Config};
use simple_crud::{CrudError, Driver, QueryHook};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: simple-crud [--config <file>] <database> dump <table>
       simple-crud [--config <file>] <database> get <table> <column> <value>";

/// A parsed command line.
#[derive(Debug, PartialEq)]
struct Invocation {
    config: Option<String>,
    database: String,
    command: Command,
}

#[derive(Debug, PartialEq)]
enum Command {
    Dump { table: String },
    Get { table: String, hook: QueryHook },
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut rest = args;
    let mut config = None;
    if rest.first().map(String::as_str) == Some("--config") {
        let path = rest.get(1).ok_or("--config requires a file")?;
        config = Some(path.clone());
        rest = &rest[2..];
    }

    let strs: Vec<&str> = rest.iter().map(String::as_str).collect();
    let (database, command) = match strs.as_slice() {
        [db, "dump", table] => (db, Command::Dump { table: table.to_string() }),
        [db, "get", table, column, value] => (
            db,
            Command::Get {
                table: table.to_string(),
                hook: QueryHook::new(*column, *value),
            },
        ),
        _ => return Err(USAGE.to_string()),
    };

    Ok(Invocation {
        config,
        database: database.to_string(),
        command,
    })
}

fn run(invocation: Invocation) -> Result<(), CrudError> {
    let mut config = match &invocation.config {
        Some(path) => config::load_config(path)?,
        None => match config::default_config_path().filter(|p| p.exists()) {
            Some(path) => config::load_config(path)?,
            None => Config::default(),
        },
    };
    config.database.path = invocation.database;

    let driver: Driver<Value> = Driver::new(config.database.open()?);
    match invocation.command {
        Command::Dump { table } => {
            for row in driver.read_all_rows(&table)? {
                println!("{}", serde_json::to_string(&row)?);
            }
        }
        Command::Get { table, hook } => {
            let row = driver.read_row(&table, &hook)?;
            println!("{}", serde_json::to_string(&row)?);
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(1);
        }
    };

    info!("Starting simple-crud on {}", invocation.database);
    if let Err(e) = run(invocation) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
