pub mod config;
pub mod run;

use ballot_config::LedgerConfig;
use primitives::Deployment;

use crate::{
    cli::{Args, Commands},
    result::{CliError, Result},
};

pub fn exec(args: Args) -> Result<()> {
    telemetry::debug!("args: {:?}", args);
    telemetry::info!(deployment = %Deployment::current(), "ballot starting");

    let config = load_config(&args)?;

    match args.command {
        Some(Commands::Run(opts)) => run::exec(opts, config),
        Some(Commands::Config(opts)) => config::exec(opts, config),
        None => Err(CliError::NoSubcommand),
    }
}

/// Reads the ledger config named by `--config`, falling back to defaults.
fn load_config(args: &Args) -> Result<LedgerConfig> {
    match &args.config {
        Some(path) => {
            telemetry::info!("reading ledger config from {}", path.display());
            Ok(LedgerConfig::from_file(path)?)
        },
        None => Ok(LedgerConfig::default()),
    }
}
