use std::collections::HashSet;

use indexmap::IndexMap;
use primitives::{
    Address, ConstituencyId, NationalIdHash, VoterId, FIRST_SEQUENCE_ID, MIN_CONSTITUENCY_ID,
};
use serde::{Deserialize, Serialize};
use telemetry::{debug, info};

use crate::{
    roles::{require_officer, require_same_constituency},
    ElectionError, Result, RoleLookup, VoterLookup, VoterRoll,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    pub account: Address,
    pub name: String,
    pub age: u8,
    pub national_id_hash: NationalIdHash,
    pub external_voter_id: String,
    pub constituency: ConstituencyId,
    pub has_registered: bool,
    /// Set by an officer of the voter's constituency; never cleared
    pub is_allowed_to_vote: bool,
    pub has_voted: bool,
}

/// Details a voter supplies when registering themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRegistration {
    pub name: String,
    pub age: u8,
    pub national_id_hash: NationalIdHash,
    pub external_voter_id: String,
    pub constituency: ConstituencyId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterStatistics {
    pub total_registered: usize,
    pub total_verified: usize,
    pub total_voted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRegistry {
    voters: IndexMap<Address, Voter>,
    next_voter_id: VoterId,
    min_voter_age: u8,
}

impl VoterRegistry {
    pub fn new(min_voter_age: u8) -> Self {
        Self {
            voters: IndexMap::new(),
            next_voter_id: FIRST_SEQUENCE_ID,
            min_voter_age,
        }
    }

    pub fn register_as_voter(
        &mut self,
        caller: &Address,
        registration: VoterRegistration,
    ) -> Result<Voter> {
        if self.voters.contains_key(caller) {
            return Err(ElectionError::AlreadyRegistered(*caller));
        }

        self.validate_registration(&registration)?;

        let voter = Voter {
            id: self.next_voter_id,
            account: *caller,
            name: registration.name,
            age: registration.age,
            national_id_hash: registration.national_id_hash,
            external_voter_id: registration.external_voter_id,
            constituency: registration.constituency,
            has_registered: true,
            is_allowed_to_vote: false,
            has_voted: false,
        };

        self.next_voter_id += 1;
        self.voters.insert(*caller, voter.clone());

        info!(voter = %caller, id = voter.id, constituency = voter.constituency, "voter registered");

        Ok(voter)
    }

    fn validate_registration(&self, registration: &VoterRegistration) -> Result<()> {
        if registration.age < self.min_voter_age {
            return Err(ElectionError::InvalidInput(format!(
                "voter must be at least {} years old",
                self.min_voter_age
            )));
        }

        if registration.name.trim().is_empty() {
            return Err(ElectionError::InvalidInput(
                "voter name must not be empty".to_string(),
            ));
        }

        if registration.national_id_hash.is_empty() {
            return Err(ElectionError::InvalidInput(
                "national id hash must not be empty".to_string(),
            ));
        }

        if registration.constituency < MIN_CONSTITUENCY_ID {
            return Err(ElectionError::InvalidInput(format!(
                "constituency must be at least {MIN_CONSTITUENCY_ID}"
            )));
        }

        Ok(())
    }

    /// Records an officer's review of a voter. The officer must attest to the
    /// credentials the voter registered with. A negative decision is accepted
    /// but changes nothing, so a verified voter is never reverted.
    ///
    /// Returns whether the voter is now allowed to vote.
    pub fn verify_voter(
        &mut self,
        roles: &dyn RoleLookup,
        caller: &Address,
        account: &Address,
        expected_national_id_hash: &NationalIdHash,
        expected_external_voter_id: &str,
        decision: bool,
    ) -> Result<bool> {
        let officer_constituency = require_officer(roles, caller, "verify voters")?;

        let voter = self
            .voters
            .get_mut(account)
            .ok_or_else(|| ElectionError::NotFound(format!("voter {account}")))?;

        require_same_constituency(officer_constituency, voter.constituency)?;

        if voter.national_id_hash != *expected_national_id_hash
            || voter.external_voter_id != expected_external_voter_id
        {
            return Err(ElectionError::InvalidInput(format!(
                "credentials do not match the record of {account}"
            )));
        }

        if decision {
            if voter.is_allowed_to_vote {
                return Err(ElectionError::AlreadyVerified(*account));
            }
            voter.is_allowed_to_vote = true;
            info!(voter = %account, officer = %caller, "voter verified");
        } else {
            debug!(voter = %account, officer = %caller, "voter review declined");
        }

        Ok(voter.is_allowed_to_vote)
    }

    /// Applies a batch of decisions from one officer. Every entry is checked
    /// before any is applied; one bad entry rejects the whole batch.
    ///
    /// Returns the number of voters newly allowed to vote.
    pub fn bulk_verify_voters(
        &mut self,
        roles: &dyn RoleLookup,
        caller: &Address,
        accounts: &[Address],
        decisions: &[bool],
    ) -> Result<usize> {
        let officer_constituency = require_officer(roles, caller, "verify voters")?;

        if accounts.len() != decisions.len() {
            return Err(ElectionError::InvalidInput(format!(
                "{} accounts but {} decisions",
                accounts.len(),
                decisions.len()
            )));
        }

        let mut approved = HashSet::new();
        for (account, decision) in accounts.iter().zip(decisions) {
            let voter = self
                .voters
                .get(account)
                .ok_or_else(|| ElectionError::NotFound(format!("voter {account}")))?;

            require_same_constituency(officer_constituency, voter.constituency)?;

            if *decision && (voter.is_allowed_to_vote || !approved.insert(*account)) {
                return Err(ElectionError::AlreadyVerified(*account));
            }
        }

        for account in &approved {
            if let Some(voter) = self.voters.get_mut(account) {
                voter.is_allowed_to_vote = true;
            }
        }

        info!(officer = %caller, verified = approved.len(), reviewed = accounts.len(), "bulk voter review applied");

        Ok(approved.len())
    }

    pub fn voter_by_account(&self, account: &Address) -> Result<&Voter> {
        self.voters
            .get(account)
            .ok_or_else(|| ElectionError::NotFound(format!("voter {account}")))
    }

    /// Voters are never deleted, so ids map straight onto registration order.
    pub fn voter_by_id(&self, id: VoterId) -> Result<&Voter> {
        id.checked_sub(FIRST_SEQUENCE_ID)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.voters.get_index(index))
            .map(|(_, voter)| voter)
            .filter(|voter| voter.id == id)
            .ok_or_else(|| ElectionError::NotFound(format!("voter id {id}")))
    }

    /// Voter accounts in registration order.
    pub fn all_voters(&self) -> Vec<Address> {
        self.voters.keys().copied().collect()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn voters_by_constituency(&self, constituency: ConstituencyId) -> Vec<&Voter> {
        self.voters
            .values()
            .filter(|voter| voter.constituency == constituency)
            .collect()
    }

    pub fn min_voter_age(&self) -> u8 {
        self.min_voter_age
    }

    pub fn statistics(&self) -> VoterStatistics {
        self.voters
            .values()
            .fold(VoterStatistics::default(), |mut stats, voter| {
                stats.total_registered += 1;
                stats.total_verified += usize::from(voter.is_allowed_to_vote);
                stats.total_voted += usize::from(voter.has_voted);
                stats
            })
    }
}

impl VoterLookup for VoterRegistry {
    fn voter(&self, account: &Address) -> Option<&Voter> {
        self.voters.get(account)
    }
}

impl VoterRoll for VoterRegistry {
    fn mark_voted(&mut self, account: &Address) -> Result<()> {
        let voter = self
            .voters
            .get_mut(account)
            .ok_or(ElectionError::VoterNotFound(*account))?;

        if !voter.is_allowed_to_vote {
            return Err(ElectionError::VoterNotVerified(*account));
        }

        if voter.has_voted {
            return Err(ElectionError::AlreadyVoted(*account));
        }

        voter.has_voted = true;

        Ok(())
    }
}
