use primitives::{Address, Balance, CandidateId, ConstituencyId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct OfficerAppointment {
    pub account: Address,
    pub constituency: ConstituencyId,
    /// True when an existing officer record was overwritten
    pub reassigned: bool,
}

/// Outcome of an officer reviewing a voter or candidate.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    pub subject: Address,
    pub officer: Address,
    pub approved: bool,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct DepositRelease {
    pub candidate_id: CandidateId,
    pub payee: Address,
    pub amount: Balance,
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum LifecycleAction {
    Paused,
    Resumed,
    Cancelled,
    Closed,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct LifecycleChange {
    pub action: LifecycleAction,
    pub at: Timestamp,
}
