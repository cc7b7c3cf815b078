use ballot_config::LedgerConfig;
use clap::{Parser, Subcommand};

use crate::result::{CliError, Result};

#[derive(Debug, Subcommand)]
pub enum ConfigCmd {
    /// Prints the effective ledger configuration as JSON
    Info,

    /// Checks the configuration and reports whether it is usable
    Validate,
}

#[derive(Parser, Debug)]
pub struct ConfigOpts {
    #[clap(subcommand)]
    pub subcommand: Option<ConfigCmd>,
}

pub fn exec(opts: ConfigOpts, config: LedgerConfig) -> Result<()> {
    match opts.subcommand.unwrap_or(ConfigCmd::Info) {
        ConfigCmd::Info => {
            let serialized = serde_json::to_string_pretty(&config)
                .map_err(|err| CliError::Other(format!("unable to serialize config: {err}")))?;

            println!("{serialized}");
        },
        ConfigCmd::Validate => {
            config.validate()?;
            println!("configuration is valid");
        },
    }

    Ok(())
}
