use election::ElectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("no subcommand provided")]
    NoSubcommand,

    #[error("config error: {0}")]
    Config(#[from] ballot_config::ConfigError),

    #[error("election error: {0}")]
    Election(#[from] ElectionError),

    #[error("primitive error: {0}")]
    Primitive(#[from] primitives::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid script: {0}")]
    Script(String),

    #[error("step {step} ({action}) failed: {reason}")]
    StepFailed {
        step: usize,
        action: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
