use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use keystore::cli::{Cli, Command};
use keystore::{FileStore, Storage};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let path = cli.path.unwrap_or_else(|| keystore::default_store_path("skillfolio"));

    info!("keystore opening {}", path.display());
    let mut store = FileStore::open(&path).context(format!("Failed to open store at {}", path.display()))?;

    match cli.command {
        Command::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("{} No value for key: {}", "✗".red(), key.yellow());
                std::process::exit(1);
            }
        },
        Command::Set { key, value } => {
            store.set(&key, &value)?;
            println!("{} Stored: {}", "✓".green(), key.cyan());
        }
        Command::Rm { key } => {
            store.remove(&key)?;
            println!("{} Removed: {}", "✓".green(), key);
        }
        Command::List => {
            let keys = store.keys()?;
            if keys.is_empty() {
                println!("No keys found");
            } else {
                for key in keys {
                    let len = store.get(&key)?.map(|v| v.len()).unwrap_or(0);
                    println!("{} {}", key.cyan(), format!("({} bytes)", len).dimmed());
                }
            }
        }
    }

    Ok(())
}
