//! Command-line client for the ledgertodo storage core.
//!
//! # Responsibility
//! - Drive both storage strategies against a file-backed ledger.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand, ValueEnum};
use ledgertodo_core::{
    default_log_level, init_logging, initialize_counter, open_ledger, read_counter, ItemPatch,
    OwnerId, PerItemStore, SingleRecordStore, TodoItem, TodoService, TodoStore,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ledgertodo")]
#[command(about = "A CLI client for the ledgertodo record store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ledger database file.
    #[arg(short, long, default_value = "ledgertodo.sqlite3")]
    ledger: PathBuf,

    /// Owner identity (UUID); mint one with `new-owner`.
    #[arg(short, long)]
    owner: Option<String>,

    /// Storage strategy.
    #[arg(short, long, value_enum, default_value_t = Strategy::PerItem)]
    strategy: Strategy,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long)]
    log_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Whole list in one growing record per owner.
    Single,
    /// One record per item plus a per-owner index record.
    PerItem,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a new owner identity.
    NewOwner,
    /// Initialize the shared aggregate counter record.
    InitCounter,
    /// Initialize the owner's list record.
    Init,
    /// Create a new item.
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: String,
    },
    /// Patch an existing item.
    Update {
        #[arg(short, long)]
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete an item.
    Remove {
        #[arg(short, long)]
        id: u64,
    },
    /// List the owner's items.
    List {
        /// Emit items as JSON instead of text lines.
        #[arg(long)]
        json: bool,
    },
    /// Show one item.
    Get {
        #[arg(short, long)]
        id: u64,
        #[arg(long)]
        json: bool,
    },
    /// Show the aggregate counter.
    Counter,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(default_log_level(), log_dir)?;
    }

    if let Commands::NewOwner = cli.command {
        println!("{}", OwnerId::new_random());
        return Ok(());
    }

    let conn = open_ledger(&cli.ledger).map_err(|err| err.to_string())?;

    match cli.strategy {
        Strategy::Single => dispatch(&cli, TodoService::new(SingleRecordStore::new(&conn)), &conn),
        Strategy::PerItem => dispatch(&cli, TodoService::new(PerItemStore::new(&conn)), &conn),
    }
}

fn dispatch<S: TodoStore>(
    cli: &Cli,
    service: TodoService<S>,
    conn: &Connection,
) -> Result<(), String> {
    match &cli.command {
        Commands::NewOwner => unreachable!("handled before the ledger is opened"),
        Commands::InitCounter => {
            initialize_counter(conn).map_err(|err| err.to_string())?;
            println!("counter initialized");
            Ok(())
        }
        Commands::Counter => {
            match read_counter(conn).map_err(|err| err.to_string())? {
                Some(counter) => println!("total_items={}", counter.total_items),
                None => println!("counter not initialized"),
            }
            Ok(())
        }
        Commands::Init => {
            let owner = required_owner(cli)?;
            let address = service.initialize(&owner).map_err(|err| err.to_string())?;
            println!("initialized record at {address}");
            Ok(())
        }
        Commands::Add { title, description } => {
            let owner = required_owner(cli)?;
            let created = service
                .add_item(&owner, title.clone(), description.clone())
                .map_err(|err| err.to_string())?;
            println!("created item {} at {}", created.id, created.record_address);
            Ok(())
        }
        Commands::Update {
            id,
            title,
            description,
            completed,
        } => {
            let owner = required_owner(cli)?;
            let patch = ItemPatch {
                title: title.clone(),
                description: description.clone(),
                completed: *completed,
            };
            service
                .update_item(&owner, &owner, *id, patch)
                .map_err(|err| err.to_string())?;
            println!("updated item {id}");
            Ok(())
        }
        Commands::Remove { id } => {
            let owner = required_owner(cli)?;
            service
                .remove_item(&owner, &owner, *id)
                .map_err(|err| err.to_string())?;
            println!("removed item {id}");
            Ok(())
        }
        Commands::List { json } => {
            let owner = required_owner(cli)?;
            let items = service.items(&owner).map_err(|err| err.to_string())?;
            if *json {
                let rendered =
                    serde_json::to_string_pretty(&items).map_err(|err| err.to_string())?;
                println!("{rendered}");
            } else {
                for item in items {
                    println!("{}", render_item(&item));
                }
            }
            Ok(())
        }
        Commands::Get { id, json } => {
            let owner = required_owner(cli)?;
            match service.item(&owner, *id).map_err(|err| err.to_string())? {
                Some(item) if *json => {
                    let rendered =
                        serde_json::to_string_pretty(&item).map_err(|err| err.to_string())?;
                    println!("{rendered}");
                }
                Some(item) => println!("{}", render_item(&item)),
                None => println!("no item with id {id}"),
            }
            Ok(())
        }
    }
}

fn required_owner(cli: &Cli) -> Result<OwnerId, String> {
    let value = cli
        .owner
        .as_deref()
        .ok_or("this command needs --owner; mint one with `ledgertodo new-owner`")?;
    OwnerId::parse_str(value).map_err(|err| format!("invalid owner id `{value}`: {err}"))
}

fn render_item(item: &TodoItem) -> String {
    let marker = if item.completed { "x" } else { " " };
    format!("[{marker}] {}: {} ({})", item.id, item.title, item.description)
}
