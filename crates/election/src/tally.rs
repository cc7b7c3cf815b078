use std::{collections::BTreeMap, fmt};

use ballot_config::ElectionWindow;
use primitives::{
    Address, CandidateId, ConstituencyId, Timestamp, VoteCount, VoterId, MIN_CONSTITUENCY_ID,
};
use serde::{Deserialize, Serialize};
use telemetry::info;

use crate::{
    roles::require_commissioner, CandidateLookup, ElectionError, Result, RoleLookup, VoterRoll,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionPhase {
    Pending,
    Active,
    Paused,
    Cancelled,
    Completed,
}

impl fmt::Display for ElectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            ElectionPhase::Pending => "pending",
            ElectionPhase::Active => "active",
            ElectionPhase::Paused => "paused",
            ElectionPhase::Cancelled => "cancelled",
            ElectionPhase::Completed => "completed",
        };
        f.write_str(phase)
    }
}

/// What a successful vote reveals: who voted and where, never for whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub voter_id: VoterId,
    pub constituency: ConstituencyId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituencyWinner {
    pub constituency: ConstituencyId,
    pub candidate_id: CandidateId,
    pub votes: VoteCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    /// `None` when the results cover every constituency
    pub constituency: Option<ConstituencyId>,
    pub candidates: Vec<CandidateId>,
    /// Parallel to `candidates`
    pub vote_counts: Vec<VoteCount>,
    pub winners: Vec<ConstituencyWinner>,
    pub result_declared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionStatus {
    pub phase: ElectionPhase,
    pub active: bool,
    pub paused: bool,
    pub cancelled: bool,
    pub time_remaining: Timestamp,
    pub total_votes: VoteCount,
}

/// Running vote counts and the election lifecycle.
///
/// Pending and Completed are derived from the clock on every call; pause,
/// resume, cancel and close are explicit commissioner actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionTally {
    window: ElectionWindow,
    vote_counts: BTreeMap<CandidateId, VoteCount>,
    constituency_totals: BTreeMap<ConstituencyId, VoteCount>,
    total_votes: VoteCount,
    paused: bool,
    cancelled_at: Option<Timestamp>,
    closed_at: Option<Timestamp>,
}

impl ElectionTally {
    pub fn new(window: ElectionWindow) -> Self {
        Self {
            window,
            vote_counts: BTreeMap::new(),
            constituency_totals: BTreeMap::new(),
            total_votes: 0,
            paused: false,
            cancelled_at: None,
            closed_at: None,
        }
    }

    pub fn window(&self) -> &ElectionWindow {
        &self.window
    }

    pub fn phase(&self, now: Timestamp) -> ElectionPhase {
        if self.cancelled_at.is_some() {
            ElectionPhase::Cancelled
        } else if self.closed_at.is_some() || self.window.has_ended(now) {
            ElectionPhase::Completed
        } else if !self.window.has_started(now) {
            ElectionPhase::Pending
        } else if self.paused {
            ElectionPhase::Paused
        } else {
            ElectionPhase::Active
        }
    }

    fn ensure_open(&self, now: Timestamp) -> Result<ElectionPhase> {
        match self.phase(now) {
            ElectionPhase::Cancelled => Err(ElectionError::Cancelled),
            ElectionPhase::Completed => Err(ElectionError::NotActive(ElectionPhase::Completed)),
            phase => Ok(phase),
        }
    }

    pub fn pause(&mut self, roles: &dyn RoleLookup, caller: &Address, now: Timestamp) -> Result<()> {
        require_commissioner(roles, caller, "pause the election")?;

        match self.ensure_open(now)? {
            ElectionPhase::Active => {
                self.paused = true;
                info!(at = now, "election paused");
                Ok(())
            },
            phase => Err(ElectionError::NotActive(phase)),
        }
    }

    pub fn resume(&mut self, roles: &dyn RoleLookup, caller: &Address, now: Timestamp) -> Result<()> {
        require_commissioner(roles, caller, "resume the election")?;

        match self.ensure_open(now)? {
            ElectionPhase::Paused => {
                self.paused = false;
                info!(at = now, "election resumed");
                Ok(())
            },
            phase => Err(ElectionError::InvalidInput(format!(
                "election is {phase}, not paused"
            ))),
        }
    }

    /// Terminal. Votes already cast stay counted but no result is declared.
    pub fn cancel(&mut self, roles: &dyn RoleLookup, caller: &Address, now: Timestamp) -> Result<()> {
        require_commissioner(roles, caller, "cancel the election")?;
        self.ensure_open(now)?;

        self.cancelled_at = Some(now);
        info!(at = now, total_votes = self.total_votes, "election cancelled");

        Ok(())
    }

    /// Ends voting ahead of the configured window.
    pub fn close(&mut self, roles: &dyn RoleLookup, caller: &Address, now: Timestamp) -> Result<()> {
        require_commissioner(roles, caller, "close the election")?;
        self.ensure_open(now)?;

        self.closed_at = Some(now);
        info!(at = now, total_votes = self.total_votes, "election closed");

        Ok(())
    }

    /// Accepts one ballot from `caller`. The voter is always resolved from
    /// the caller; a supplied voter id only has to agree with it.
    ///
    /// Marking the voter and bumping the counts happen together or not at
    /// all.
    pub fn register_vote(
        &mut self,
        now: Timestamp,
        caller: &Address,
        claimed_voter_id: Option<VoterId>,
        candidate_id: CandidateId,
        voters: &mut dyn VoterRoll,
        candidates: &dyn CandidateLookup,
    ) -> Result<VoteReceipt> {
        match self.phase(now) {
            ElectionPhase::Active => {},
            ElectionPhase::Cancelled => return Err(ElectionError::Cancelled),
            phase => return Err(ElectionError::NotActive(phase)),
        }

        let voter = voters
            .voter(caller)
            .ok_or(ElectionError::VoterNotFound(*caller))?;
        let (voter_id, voter_constituency, allowed, has_voted) = (
            voter.id,
            voter.constituency,
            voter.is_allowed_to_vote,
            voter.has_voted,
        );

        if let Some(claimed) = claimed_voter_id {
            if claimed != voter_id {
                return Err(ElectionError::Unauthorized {
                    caller: *caller,
                    action: "vote with another voter's id",
                });
            }
        }

        let candidate = candidates
            .candidate(candidate_id)
            .ok_or(ElectionError::CandidateNotFound(candidate_id))?;

        if !allowed {
            return Err(ElectionError::VoterNotVerified(*caller));
        }

        if has_voted {
            return Err(ElectionError::AlreadyVoted(*caller));
        }

        if !candidate.is_verified {
            return Err(ElectionError::CandidateNotVerified(candidate_id));
        }

        if voter_constituency != candidate.constituency {
            return Err(ElectionError::ConstituencyMismatch {
                expected: voter_constituency,
                found: candidate.constituency,
            });
        }

        let candidate_votes = self
            .vote_count(candidate_id)
            .checked_add(1)
            .ok_or(ElectionError::Overflow("candidate vote count"))?;
        let constituency_votes = self
            .constituency_total(voter_constituency)
            .checked_add(1)
            .ok_or(ElectionError::Overflow("constituency vote count"))?;
        let total_votes = self
            .total_votes
            .checked_add(1)
            .ok_or(ElectionError::Overflow("total votes"))?;

        voters.mark_voted(caller)?;

        self.vote_counts.insert(candidate_id, candidate_votes);
        self.constituency_totals
            .insert(voter_constituency, constituency_votes);
        self.total_votes = total_votes;

        info!(voter_id, constituency = voter_constituency, "vote recorded");

        Ok(VoteReceipt {
            voter_id,
            constituency: voter_constituency,
        })
    }

    pub fn vote_count(&self, candidate_id: CandidateId) -> VoteCount {
        self.vote_counts
            .get(&candidate_id)
            .copied()
            .unwrap_or_default()
    }

    /// Votes cast in a constituency, including votes for candidates removed
    /// since.
    pub fn constituency_total(&self, constituency: ConstituencyId) -> VoteCount {
        self.constituency_totals
            .get(&constituency)
            .copied()
            .unwrap_or_default()
    }

    pub fn total_votes(&self) -> VoteCount {
        self.total_votes
    }

    /// Sum of every per-candidate count. Always equal to `total_votes`.
    pub fn counted_votes(&self) -> VoteCount {
        self.vote_counts
            .values()
            .fold(0, |acc: VoteCount, count| acc.saturating_add(*count))
    }

    pub fn election_results(
        &self,
        now: Timestamp,
        constituency: Option<ConstituencyId>,
        candidates: &dyn CandidateLookup,
    ) -> Result<ElectionResults> {
        if let Some(constituency) = constituency {
            if constituency < MIN_CONSTITUENCY_ID {
                return Err(ElectionError::InvalidInput(format!(
                    "constituency must be at least {MIN_CONSTITUENCY_ID}"
                )));
            }
        }

        let standing: Vec<(CandidateId, ConstituencyId, VoteCount)> = candidates
            .candidates()
            .into_iter()
            .filter(|candidate| constituency.map_or(true, |c| candidate.constituency == c))
            .map(|candidate| {
                (
                    candidate.id,
                    candidate.constituency,
                    self.vote_count(candidate.id),
                )
            })
            .collect();

        let mut leaders: BTreeMap<ConstituencyId, (CandidateId, VoteCount)> = BTreeMap::new();
        for (candidate_id, constituency, votes) in &standing {
            if *votes == 0 {
                continue;
            }

            let leader = leaders
                .entry(*constituency)
                .or_insert((*candidate_id, *votes));
            if *votes > leader.1 || (*votes == leader.1 && *candidate_id < leader.0) {
                *leader = (*candidate_id, *votes);
            }
        }

        Ok(ElectionResults {
            constituency,
            candidates: standing.iter().map(|(id, _, _)| *id).collect(),
            vote_counts: standing.iter().map(|(_, _, votes)| *votes).collect(),
            winners: leaders
                .into_iter()
                .map(|(constituency, (candidate_id, votes))| ConstituencyWinner {
                    constituency,
                    candidate_id,
                    votes,
                })
                .collect(),
            result_declared: self.phase(now) == ElectionPhase::Completed,
        })
    }

    pub fn election_status(&self, now: Timestamp) -> ElectionStatus {
        let phase = self.phase(now);
        let time_remaining = match phase {
            ElectionPhase::Cancelled | ElectionPhase::Completed => 0,
            _ => self.window.time_remaining(now),
        };

        ElectionStatus {
            phase,
            active: phase == ElectionPhase::Active,
            paused: phase == ElectionPhase::Paused,
            cancelled: phase == ElectionPhase::Cancelled,
            time_remaining,
            total_votes: self.total_votes,
        }
    }
}
