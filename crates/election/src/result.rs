use primitives::{Address, Balance, CandidateId, ConstituencyId};
use thiserror::Error;

use crate::ElectionPhase;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElectionError {
    #[error("{caller} is not authorized to {action}")]
    Unauthorized {
        caller: Address,
        action: &'static str,
    },

    #[error("constituency mismatch: expected {expected}, found {found}")]
    ConstituencyMismatch {
        expected: ConstituencyId,
        found: ConstituencyId,
    },

    #[error("{0} is already registered")]
    AlreadyRegistered(Address),

    #[error("{0} is already verified")]
    AlreadyVerified(Address),

    #[error("{0} has already voted")]
    AlreadyVoted(Address),

    #[error("{0} not found")]
    NotFound(String),

    #[error("no voter registered for {0}")]
    VoterNotFound(Address),

    #[error("candidate {0} not found")]
    CandidateNotFound(CandidateId),

    #[error("voter {0} has not been verified")]
    VoterNotVerified(Address),

    #[error("candidate {0} has not been verified")]
    CandidateNotVerified(CandidateId),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("attached payment {attached} does not match declared deposit {expected}")]
    DepositMismatch { expected: Balance, attached: Balance },

    #[error("election is not active: {0}")]
    NotActive(ElectionPhase),

    #[error("election has been cancelled")]
    Cancelled,

    #[error("{account} holds {available}, needs {required}")]
    InsufficientFunds {
        account: Address,
        required: Balance,
        available: Balance,
    },

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, ElectionError>;
