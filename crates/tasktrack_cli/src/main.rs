//! Command-line front end for the task tracker core.
//!
//! # Responsibility
//! - Translate subcommands into core commands and print the returned views.
//! - Degrade to an in-memory store when the database cannot be opened.

mod cli;
mod commands;
mod render;

use clap::Parser;
use cli::Cli;
use log::warn;
use tasktrack_core::{
    init_logging, AppConfig, AppContext, MemoryKvRepository, SqliteKvRepository, StorageAdapter,
};

fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let db_path = cli.db.clone().unwrap_or(config.db_path);
    let storage = match SqliteKvRepository::open(&db_path) {
        Ok(repo) => StorageAdapter::new(repo),
        Err(err) => {
            warn!("event=cli_start module=cli status=degraded error_code=db_open_failed error={err}");
            eprintln!(
                "warning: cannot open `{}` ({err}); changes will not be saved",
                db_path.display()
            );
            StorageAdapter::new(MemoryKvRepository::new())
        }
    };

    let mut app = AppContext::open(storage);
    let today = chrono::Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = commands::execute(&mut app, cli.command, cli.json, today, &mut stdout) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
