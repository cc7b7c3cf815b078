use election::{Candidate, ElectionResults, ElectionStatus};
use primitives::{CandidateId, ConstituencyId, VoteCount};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Tabled)]
pub struct StepRow {
    pub step: usize,
    pub action: &'static str,
    pub outcome: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct StandingRow {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
    pub constituency: ConstituencyId,
    pub votes: VoteCount,
    pub winner: bool,
}

#[derive(Debug, Clone, Tabled)]
pub struct StatusRow {
    pub phase: String,
    pub active: bool,
    pub paused: bool,
    pub cancelled: bool,
    pub time_remaining: u64,
    pub total_votes: VoteCount,
}

impl From<&ElectionStatus> for StatusRow {
    fn from(status: &ElectionStatus) -> Self {
        Self {
            phase: status.phase.to_string(),
            active: status.active,
            paused: status.paused,
            cancelled: status.cancelled,
            time_remaining: status.time_remaining,
            total_votes: status.total_votes,
        }
    }
}

/// Joins tallied results with candidate details for display.
pub fn standings<'a>(
    results: &ElectionResults,
    lookup: impl Fn(CandidateId) -> Option<&'a Candidate>,
) -> Vec<StandingRow> {
    results
        .candidates
        .iter()
        .zip(&results.vote_counts)
        .filter_map(|(id, votes)| {
            let candidate = lookup(*id)?;
            Some(StandingRow {
                id: *id,
                name: candidate.name.clone(),
                party: candidate.party.clone(),
                constituency: candidate.constituency,
                votes: *votes,
                winner: results
                    .winners
                    .iter()
                    .any(|winner| winner.candidate_id == *id),
            })
        })
        .collect()
}

pub fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).to_string()
}
