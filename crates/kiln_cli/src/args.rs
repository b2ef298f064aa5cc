use crate::{add::AddArgs, ensure::EnsureArgs};
use clap::{Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// log progress, twice for debug output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Add a file to the local store and print its store path
    Add(AddArgs),
    /// Check that a store path is valid in the local store
    Ensure(EnsureArgs),
    /// List the registered language builtins
    Builtins,
}
