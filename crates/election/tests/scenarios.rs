mod common;

use common::*;
use election::ElectionError;
use primitives::Address;

#[test]
fn verified_voter_votes_exactly_once() {
    let mut election = Election::new();
    let candidate = election.verified_candidate("candidate", 1);
    let candidate_id = election.candidate_id(&candidate);

    let voter = election.register_voter("voter", 1);
    election
        .ledger
        .verify_voter(
            &election.officer_c1,
            &voter,
            &national_id("voter"),
            &external_id("voter"),
            true,
        )
        .unwrap();

    let receipt = election.ledger.cast_vote(&voter, candidate_id).unwrap();
    assert_eq!(receipt.voter_id, 1);
    assert_eq!(receipt.constituency, 1);
    assert_eq!(election.ledger.vote_count(candidate_id), 1);
    assert!(election.ledger.voter_by_account(&voter).unwrap().has_voted);

    assert_eq!(
        election.ledger.cast_vote(&voter, candidate_id),
        Err(ElectionError::AlreadyVoted(voter))
    );
    assert_eq!(election.ledger.vote_count(candidate_id), 1);
    assert_eq!(election.ledger.total_votes(), 1);
}

#[test]
fn officer_cannot_verify_outside_constituency() {
    let mut election = Election::new();
    let candidate = election.verified_candidate("candidate", 2);
    let candidate_id = election.candidate_id(&candidate);
    let voter = election.register_voter("voter", 2);

    assert_eq!(
        election.ledger.verify_voter(
            &election.officer_c1,
            &voter,
            &national_id("voter"),
            &external_id("voter"),
            true,
        ),
        Err(ElectionError::ConstituencyMismatch {
            expected: 1,
            found: 2
        })
    );
    assert_eq!(
        election.ledger.cast_vote(&voter, candidate_id),
        Err(ElectionError::VoterNotVerified(voter))
    );
}

#[test]
fn short_deposit_leaves_no_trace() {
    let mut election = Election::new();
    let account = Address::from_seed("candidate");
    election.ledger.fund_account(account, 10 * COIN).unwrap();

    assert_eq!(
        election.ledger.register_candidate(
            &account,
            candidate_application("candidate", 1, 1),
            COIN / 2
        ),
        Err(ElectionError::DepositMismatch {
            expected: COIN,
            attached: COIN / 2
        })
    );

    assert!(matches!(
        election.ledger.candidate_by_account(&account),
        Err(ElectionError::NotFound(_))
    ));
    assert!(election.ledger.all_candidates().is_empty());
    assert_eq!(election.ledger.escrowed_total(), 0);
    assert_eq!(election.ledger.balance_of(&account), 10 * COIN);
}

#[test]
fn removed_candidate_is_refunded_and_gone() {
    let mut election = Election::new();
    let candidate = election.verified_candidate("candidate", 1);
    let candidate_id = election.candidate_id(&candidate);
    let before = election.ledger.balance_of(&candidate);

    let removed = election
        .ledger
        .remove_candidate(&election.officer_c1, &candidate)
        .unwrap();

    assert_eq!(removed.security_deposit, COIN);
    assert_eq!(election.ledger.balance_of(&candidate), before + COIN);
    assert_eq!(election.ledger.escrowed_total(), 0);
    assert!(matches!(
        election.ledger.candidate_details(candidate_id),
        Err(ElectionError::NotFound(_))
    ));

    let voter = election.verified_voter("voter", 1);
    assert_eq!(
        election.ledger.cast_vote(&voter, candidate_id),
        Err(ElectionError::CandidateNotFound(candidate_id))
    );
}

#[test]
fn cross_constituency_vote_changes_nothing() {
    let mut election = Election::new();
    let candidate = election.verified_candidate("candidate", 2);
    let candidate_id = election.candidate_id(&candidate);
    let voter = election.verified_voter("voter", 1);

    assert_eq!(
        election.ledger.cast_vote(&voter, candidate_id),
        Err(ElectionError::ConstituencyMismatch {
            expected: 1,
            found: 2
        })
    );

    assert_eq!(election.ledger.vote_count(candidate_id), 0);
    assert_eq!(election.ledger.total_votes(), 0);
    assert!(!election.ledger.voter_by_account(&voter).unwrap().has_voted);
}

#[test]
fn register_vote_binds_the_voter_id_to_the_caller() {
    let mut election = Election::new();
    let candidate = election.verified_candidate("candidate", 1);
    let candidate_id = election.candidate_id(&candidate);
    let alice = election.verified_voter("alice", 1);
    let bob = election.verified_voter("bob", 1);
    let bob_id = election.ledger.voter_by_account(&bob).unwrap().id;

    assert!(matches!(
        election.ledger.register_vote(&alice, bob_id, candidate_id),
        Err(ElectionError::Unauthorized { .. })
    ));
    assert!(!election.ledger.voter_by_account(&bob).unwrap().has_voted);

    election
        .ledger
        .register_vote(&bob, bob_id, candidate_id)
        .unwrap();
    assert_eq!(election.ledger.vote_count(candidate_id), 1);
    assert!(!election.ledger.voter_by_account(&alice).unwrap().has_voted);
}

#[test]
fn votes_respect_the_election_window() {
    let mut election = Election::new();
    let candidate = election.verified_candidate("candidate", 1);
    let candidate_id = election.candidate_id(&candidate);
    let early = election.verified_voter("early", 1);
    let late = election.verified_voter("late", 1);

    election.ledger.clock().set(START - 1);
    assert!(matches!(
        election.ledger.cast_vote(&early, candidate_id),
        Err(ElectionError::NotActive(_))
    ));

    election.ledger.clock().set(START);
    election.ledger.cast_vote(&early, candidate_id).unwrap();

    election.ledger.clock().set(END);
    assert!(matches!(
        election.ledger.cast_vote(&late, candidate_id),
        Err(ElectionError::NotActive(_))
    ));
    assert_eq!(election.ledger.total_votes(), 1);
}

#[test]
fn paused_and_cancelled_elections_refuse_votes() {
    let mut election = Election::new();
    let commissioner = election.commissioner;
    let candidate = election.verified_candidate("candidate", 1);
    let candidate_id = election.candidate_id(&candidate);
    let voter = election.verified_voter("voter", 1);

    election.ledger.pause_election(&commissioner).unwrap();
    assert!(matches!(
        election.ledger.cast_vote(&voter, candidate_id),
        Err(ElectionError::NotActive(_))
    ));

    election.ledger.resume_election(&commissioner).unwrap();
    election.ledger.cancel_election(&commissioner).unwrap();
    assert_eq!(
        election.ledger.cast_vote(&voter, candidate_id),
        Err(ElectionError::Cancelled)
    );
    assert!(!election.ledger.election_status().active);
    assert!(election.ledger.election_status().cancelled);
}
