use std::{fs, path::Path, str::FromStr};

use ballot_config::ElectionWindow;
use primitives::{Address, Balance, CandidateId, Coins, ConstituencyId, Timestamp, VoterId};
use serde::{Deserialize, Serialize};

use crate::result::{CliError, Result};

/// Names an account either by a literal `0x` address or by a label that is
/// hashed into a stable fixture address. The label `commissioner` therefore
/// matches the default configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountRef(pub String);

impl AccountRef {
    pub fn address(&self) -> Address {
        Address::from_str(&self.0).unwrap_or_else(|_| Address::from_seed(&self.0))
    }
}

/// A replayable sequence of ledger calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Overrides the configured election window
    #[serde(default)]
    pub window: Option<ElectionWindow>,

    /// Clock value before the first step; defaults to the window start
    #[serde(default)]
    pub start_time: Option<Timestamp>,

    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let read = fs::read(path.as_ref())?;

        serde_json::from_slice(&read).map_err(|err| CliError::Script(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Fund {
        account: AccountRef,
        coins: Coins,
    },
    AppointOfficer {
        caller: AccountRef,
        account: AccountRef,
        name: String,
        constituency: ConstituencyId,
    },
    RegisterVoter {
        caller: AccountRef,
        name: String,
        age: u8,
        /// Hex encoded, at most twelve bytes
        national_id: String,
        external_voter_id: String,
        constituency: ConstituencyId,
    },
    VerifyVoter {
        caller: AccountRef,
        account: AccountRef,
        national_id: String,
        external_voter_id: String,
        #[serde(default = "approve")]
        decision: bool,
    },
    BulkVerifyVoters {
        caller: AccountRef,
        accounts: Vec<AccountRef>,
        decisions: Vec<bool>,
    },
    RegisterCandidate {
        caller: AccountRef,
        name: String,
        party: String,
        declared_deposit: Coins,
        age: u8,
        constituency: ConstituencyId,
        /// Attached payment in base units; defaults to the declared deposit
        #[serde(default)]
        payment: Option<String>,
    },
    VerifyCandidate {
        caller: AccountRef,
        account: AccountRef,
        #[serde(default = "approve")]
        decision: bool,
    },
    RemoveCandidate {
        caller: AccountRef,
        account: AccountRef,
    },
    Vote {
        caller: AccountRef,
        candidate_id: CandidateId,
        #[serde(default)]
        voter_id: Option<VoterId>,
    },
    Pause {
        caller: AccountRef,
    },
    Resume {
        caller: AccountRef,
    },
    Cancel {
        caller: AccountRef,
    },
    Close {
        caller: AccountRef,
    },
    SettleDeposits {
        caller: AccountRef,
    },
    AdvanceTime {
        seconds: Timestamp,
    },
}

fn approve() -> bool {
    true
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Fund { .. } => "fund",
            Step::AppointOfficer { .. } => "appoint_officer",
            Step::RegisterVoter { .. } => "register_voter",
            Step::VerifyVoter { .. } => "verify_voter",
            Step::BulkVerifyVoters { .. } => "bulk_verify_voters",
            Step::RegisterCandidate { .. } => "register_candidate",
            Step::VerifyCandidate { .. } => "verify_candidate",
            Step::RemoveCandidate { .. } => "remove_candidate",
            Step::Vote { .. } => "vote",
            Step::Pause { .. } => "pause",
            Step::Resume { .. } => "resume",
            Step::Cancel { .. } => "cancel",
            Step::Close { .. } => "close",
            Step::SettleDeposits { .. } => "settle_deposits",
            Step::AdvanceTime { .. } => "advance_time",
        }
    }
}

pub fn parse_base_units(raw: &str) -> Result<Balance> {
    raw.trim()
        .parse::<Balance>()
        .map_err(|err| CliError::Script(format!("invalid amount {raw:?}: {err}")))
}
