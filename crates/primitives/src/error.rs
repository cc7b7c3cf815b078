use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown deployment: {0}")]
    InvalidDeployment(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid national id hash: {0}")]
    InvalidNationalIdHash(String),

    #[error("amount overflows the base unit range: {0}")]
    AmountOverflow(String),

    #[error("{0}")]
    Other(String),
}
