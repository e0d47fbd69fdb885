use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::try_join_all;
use std::path::Path;
use std::sync::Arc;

use seqalloc::config::Config;
use seqalloc::storage::{open_database, GuardedCounterStore, RedbCounterStore, RedbRecordStore};
use seqalloc::utils::logging;
use seqalloc::{SequenceAllocator, UrlShortener};

#[derive(Parser)]
#[clap(version = "0.1.0", author = "Seqalloc Contributors")]
struct Cli {
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Allocate ids from the shared counter
    Next {
        #[clap(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Create a short URL
    Shorten { url: String },
    /// Look up a short code
    Resolve { code: String },
    /// Realign the counter with the highest persisted id
    Resync,
    /// Write the default configuration to a file
    InitConfig { path: String },
}

type Shortener = UrlShortener<GuardedCounterStore<RedbCounterStore>, RedbRecordStore>;

fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::load(path).with_context(|| format!("failed to load config from {}", path))
    } else {
        Ok(Config::default())
    }
}

fn build_shortener(config: &Config) -> Result<Shortener> {
    let db = open_database(&config.storage.path)
        .with_context(|| format!("failed to open storage at {}", config.storage.path))?;

    let counter =
        GuardedCounterStore::from_config(RedbCounterStore::new(Arc::clone(&db)), &config.counter);
    let allocator = SequenceAllocator::from_config(counter, &config.allocator)?;
    let records = RedbRecordStore::new(db);

    Ok(UrlShortener::new(Arc::new(allocator), Arc::new(records)))
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Next { count } => {
            let shortener = build_shortener(config)?;
            let allocator = shortener.allocator();
            let ids = try_join_all((0..count).map(|_| allocator.next_id())).await?;
            for id in ids {
                println!("{}", id);
            }
        }
        Command::Shorten { url } => {
            let shortener = build_shortener(config)?;
            let record = shortener.create_short_url(&url).await?;
            println!("{} -> {}", record.short_code, record.long_url);
        }
        Command::Resolve { code } => {
            let shortener = build_shortener(config)?;
            match shortener.resolve(&code).await? {
                Some(record) => println!("{}", record.long_url),
                None => println!("not found: {}", code),
            }
        }
        Command::Resync => {
            let shortener = build_shortener(config)?;
            let start = shortener.resynchronize().await?;
            println!("next id: {}", start);
        }
        Command::InitConfig { path } => {
            Config::default().save(&path)?;
            println!("wrote default configuration to {}", path);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.log)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let result = run(cli.command, &config).await;
    if let Err(e) = &result {
        log::error!("{:#}", e);
    }

    logging::shutdown();
    result
}
