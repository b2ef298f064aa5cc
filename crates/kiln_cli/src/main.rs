mod add;
mod args;
mod builtins;
mod ensure;
mod logger;

use add::add_cli;
use anyhow::Result;
use args::{Args, Command};
use builtins::builtins_cli;
use clap::Parser;
use ensure::ensure_cli;
use log::LevelFilter;
use logger::Logger;

fn main() -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { cli().await })
}

fn setup_logging(verbose: u8) {
    if log::set_logger(&Logger).is_err() {
        eprintln!("Unable to set logger, proceeding without one");
    } else {
        let level = if verbose > 1 {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        log::set_max_level(level);
    }
}

async fn cli() -> Result<()> {
    let args = Args::parse();
    if args.verbose > 0 {
        setup_logging(args.verbose);
    }
    match args.command {
        Command::Add(args) => add_cli(args).await,
        Command::Ensure(args) => ensure_cli(args).await,
        Command::Builtins => {
            builtins_cli();
            Ok(())
        }
    }
}
