use primitives::{Address, Balance, CandidateId, ConstituencyId, VoterId};
use serde::{Deserialize, Serialize};

use crate::event_data::*;

// NOTE: naming convention for events goes as follows:
// <Subject><Verb, in past tense>, e.g. VoterRegistered

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Event {
    /// Host account credited outside of the election flow, e.g. by a faucet.
    AccountFunded { account: Address, amount: Balance },

    /// The commissioner appointed or reassigned an officer.
    OfficerAppointed(OfficerAppointment),

    VoterRegistered {
        voter_id: VoterId,
        account: Address,
        constituency: ConstituencyId,
    },

    /// An officer reviewed a voter. `approved == false` leaves the voter
    /// unverified.
    VoterReviewed(Attestation),

    CandidateRegistered {
        candidate_id: CandidateId,
        account: Address,
        constituency: ConstituencyId,
        deposit: Balance,
    },

    CandidateReviewed(Attestation),

    /// Candidate record deleted and its deposit refunded.
    CandidateRemoved(DepositRelease),

    /// A ballot was accepted. The chosen candidate is not recorded.
    VoteCast {
        voter_id: VoterId,
        constituency: ConstituencyId,
    },

    ElectionLifecycleChanged(LifecycleChange),

    DepositRefunded(DepositRelease),

    DepositForfeited(DepositRelease),
}
