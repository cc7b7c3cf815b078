//! Read-only capabilities the components hand each other instead of reaching
//! into one another's storage.
use primitives::{Address, Balance, CandidateId, ConstituencyId};

use crate::{Candidate, Result, Voter};

pub trait RoleLookup {
    fn is_commissioner(&self, account: &Address) -> bool;

    /// Constituency the account serves as officer, if it is one.
    fn officer_constituency(&self, account: &Address) -> Option<ConstituencyId>;
}

pub trait VoterLookup {
    fn voter(&self, account: &Address) -> Option<&Voter>;
}

/// Voter access granted to the tally. `mark_voted` is the only write the tally
/// may perform on voter state.
pub trait VoterRoll: VoterLookup {
    fn mark_voted(&mut self, account: &Address) -> Result<()>;
}

pub trait CandidateLookup {
    fn candidate(&self, id: CandidateId) -> Option<&Candidate>;

    /// Every present candidate, in registration order.
    fn candidates(&self) -> Vec<&Candidate>;
}

/// Destination for refunds and forfeits leaving escrow.
pub trait FundsSink {
    fn credit(&mut self, account: &Address, amount: Balance) -> Result<()>;
}
