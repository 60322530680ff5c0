//! MiniSQL - interactive shell
//!
//! Usage: `minisql [--data-dir DIR] [--strict] [--log-level LEVEL]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use minisql::sql::{parse_command, Command};
use minisql::{EngineConfig, Error, ExecutionEngine};

const PROMPT: &str = "MiniSQL> ";

/// Print welcome banner
fn print_banner() {
    println!("Welcome to MiniSQL Engine");
}

/// Print help message
fn print_help() {
    println!(
        r#"
MiniSQL Commands:
  CREATE TABLE table_name (col1,col2,...)
  INSERT INTO table_name VALUES (val1,val2,...)
  SELECT * FROM table_name
  DELETE FROM table_name [WHERE column = value]
  EXIT

Shell Commands:
  .help              Show this help message
  .tables            List all tables
  .schema [table]    Show table columns
"#
    );
}

/// Command-line options
#[derive(Debug)]
struct Options {
    data_dir: PathBuf,
    strict: bool,
    log_level: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            strict: false,
            log_level: "warn".to_string(),
        }
    }
}

/// Simple argument parsing
fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--data-dir" | "-d" => {
                let dir = iter.next().context("--data-dir needs a directory")?;
                options.data_dir = PathBuf::from(dir);
            }
            "--strict" => options.strict = true,
            "--log-level" => {
                options.log_level = iter
                    .next()
                    .context("--log-level needs a level")?
                    .to_string();
            }
            other => anyhow::bail!("unknown argument '{}'", other),
        }
    }

    Ok(options)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle special dot commands
fn handle_special_command(cmd: &str, engine: &ExecutionEngine) {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let catalog = engine.catalog();

    match parts.first().copied() {
        Some(".help") => print_help(),
        Some(".tables") => {
            let tables = catalog.list_tables();
            if tables.is_empty() {
                println!("No tables found.");
            } else {
                println!("Tables:");
                for table in tables {
                    println!("  {}", table);
                }
            }
        }
        Some(".schema") => {
            let names = match parts.get(1) {
                Some(name) => vec![name.to_string()],
                None => catalog.list_tables(),
            };
            for name in names {
                match catalog.table_info(&name) {
                    Ok(info) => println!("{}", info),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Type '.help' for available commands.");
        }
        None => {}
    }
}

/// Main REPL loop
fn run_repl(mut engine: ExecutionEngine) -> Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to initialize line editor")?;

    print_banner();
    print_help();

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);

        if trimmed.starts_with('.') {
            handle_special_command(trimmed, &engine);
            continue;
        }

        let command = match parse_command(&line) {
            Ok(Command::Exit) => break,
            Ok(command) => command,
            Err(e @ Error::UnrecognizedCommand(_)) => {
                eprintln!("{}", e);
                print_help();
                continue;
            }
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match engine.execute(command) {
            Ok(result) => println!("{}", result),
            Err(e) => eprintln!("{}", e),
        }
    }

    debug!("read loop finished");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    init_logging(&options.log_level);

    std::fs::create_dir_all(&options.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            options.data_dir.display()
        )
    })?;

    let config = EngineConfig::new()
        .data_dir(&options.data_dir)
        .enforce_column_count(options.strict);
    let engine = ExecutionEngine::new(config).context("Failed to load catalog")?;

    run_repl(engine)
}
