//! `itemdb`: keep a local copy of the remote item catalog and search it.

use clap::{Parser, Subcommand};
use exn::{OptionExt, ResultExt};
use itemdb_catalog::{Catalog, Initialized, Record, Status};
use itemdb_config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "itemdb", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to itemdb.toml in the platform config directory)
    #[arg(long, global = true, env = "ITEMDB_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the catalog if forced or if there is no fresh cache
    Update {
        /// Crawl only these realms; other realms keep their cached records
        #[arg(long, num_args = 1..)]
        realms: Vec<String>,
        /// Crawl even when the cache is fresh
        #[arg(long)]
        force: bool,
    },
    /// Find items whose id or name contains the query
    Search {
        query: String,
        #[arg(long)]
        realm: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show one item by id
    Get {
        id: String,
        #[arg(long)]
        realm: Option<String>,
    },
    /// List every item of a realm
    List {
        #[arg(long)]
        realm: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Show when the catalog was last updated and how many items it has
    Status,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
enum CliError {
    #[display("could not load configuration")]
    Config,
    #[display("could not open the item catalog")]
    Catalog,
    #[display("update failed")]
    Update,
    #[display("no item {_0}")]
    NoSuchItem(#[error(not(source))] String),
    #[display("could not print item")]
    Output,
}

type Result<T> = std::result::Result<T, exn::Exn<CliError>>;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn print_record(record: &Record) {
    println!("{}\t{}", record.key(), record.display_name);
}

/// Realm named on the command line, or the first configured one.
fn realm_or_default(catalog: &Catalog, realm: Option<String>) -> String {
    realm.or_else(|| catalog.realms().first().cloned()).unwrap_or_default()
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| CliError::Config)?;
    tracing::debug!(realms = ?config.realm_names(), "Configuration loaded");
    let catalog = Catalog::from_config(&config).or_raise(|| CliError::Catalog)?;

    match cli.command {
        Command::Update { realms, force } => {
            if realms.is_empty() {
                match catalog.initialize(force).await {
                    Initialized::Current => println!("Item database is current"),
                    Initialized::Loaded { items } => println!("Loaded {items} items from cache"),
                    Initialized::Crawled(summary) => println!(
                        "Crawled {} items ({} skipped, {} categories failed)",
                        summary.fetched, summary.skipped, summary.failed_categories
                    ),
                }
            } else {
                let loaded = if force { None } else { catalog.load_cache().await };
                match loaded {
                    Some(items) => println!("Loaded {items} items from cache; use --force to crawl anyway"),
                    None => {
                        let summary = catalog.update_database(&realms).await.or_raise(|| CliError::Update)?;
                        println!(
                            "Crawled {} items ({} skipped, {} categories failed)",
                            summary.fetched, summary.skipped, summary.failed_categories
                        );
                    },
                }
            }
        },
        Command::Search { query, realm, limit } => {
            catalog.initialize(false).await;
            let realm = realm_or_default(&catalog, realm);
            for record in catalog.search(&query, &realm, limit) {
                print_record(&record);
            }
        },
        Command::Get { id, realm } => {
            catalog.initialize(false).await;
            let realm = realm_or_default(&catalog, realm);
            let record = catalog.get_by_id(&id, &realm).ok_or_raise(|| CliError::NoSuchItem(format!("{realm}:{id}")))?;
            let json = serde_json::to_string_pretty(&record).or_raise(|| CliError::Output)?;
            println!("{json}");
        },
        Command::List { realm, category } => {
            catalog.initialize(false).await;
            let realm = realm_or_default(&catalog, realm);
            for record in catalog.list_all(&realm, category.as_deref()) {
                print_record(&record);
            }
        },
        Command::Status => {
            catalog.initialize(false).await;
            match catalog.status() {
                Status::Uninitialized => println!("Not initialized"),
                Status::Ready { realms, total_items, last_update } => {
                    match last_update {
                        Some(at) => println!("Last update: {at}"),
                        None => println!("Last update: never"),
                    }
                    for (realm, items) in realms {
                        println!("{realm}: {items} items");
                    }
                    println!("Total: {total_items} items");
                },
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        },
    }
}
