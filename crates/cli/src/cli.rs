use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{config::ConfigOpts, run::RunOpts};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help(true))]
pub struct Args {
    /// Sets a custom ledger config file (TOML, JSON or YAML)
    #[clap(short, long, value_parser, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a scenario script against a fresh in-memory ledger
    Run(RunOpts),

    /// Inspect the ledger configuration
    Config(ConfigOpts),
}
