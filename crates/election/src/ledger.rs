use std::{fmt, fs, path::Path};

use ballot_config::LedgerConfig;
use events::{
    Attestation, DepositRelease, Event, EventObserver, LifecycleAction, LifecycleChange,
    OfficerAppointment,
};
use primitives::{
    Address, Balance, CandidateId, ConstituencyId, NationalIdHash, Timestamp, VoteCount, VoterId,
    BASIS_POINTS,
};
use serde::{Deserialize, Serialize};
use telemetry::{info, warn};

use crate::{
    roles::require_commissioner,
    AdminContext, Balances, Candidate, CandidateApplication, CandidatePolicy, CandidateRegistry,
    CandidateStatistics, Clock, ElectionError, ElectionPhase, ElectionResults, ElectionStatus,
    ElectionTally, FundsSink, ManualClock, Officer, Result, RoleLookup, RoleRegistry,
    SystemClock, VoteReceipt, Voter, VoterRegistration, VoterRegistry, VoterStatistics,
};

/// Everything the ledger persists. Observers and the clock are runtime
/// wiring and are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub config: LedgerConfig,
    pub roles: RoleRegistry,
    pub voters: VoterRegistry,
    pub candidates: CandidateRegistry,
    pub tally: ElectionTally,
    pub balances: Balances,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub refunded: Vec<DepositRelease>,
    pub forfeited: Vec<DepositRelease>,
}

impl SettlementReport {
    pub fn is_empty(&self) -> bool {
        self.refunded.is_empty() && self.forfeited.is_empty()
    }
}

/// The host-facing surface of the election: every call names its caller,
/// runs to completion and either applies fully or leaves state untouched.
pub struct ElectionLedger<C: Clock = SystemClock> {
    config: LedgerConfig,
    roles: RoleRegistry,
    voters: VoterRegistry,
    candidates: CandidateRegistry,
    tally: ElectionTally,
    balances: Balances,
    clock: C,
    observers: Vec<Box<dyn EventObserver>>,
}

impl ElectionLedger<SystemClock> {
    pub fn new(config: LedgerConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl ElectionLedger<ManualClock> {
    /// Ledger driven by a [`ManualClock`] starting at `now`. Keep a clone of
    /// [`ElectionLedger::clock`] to move time forward.
    pub fn with_manual_clock(config: LedgerConfig, now: Timestamp) -> Result<Self> {
        Self::with_clock(config, ManualClock::new(now))
    }
}

impl<C: Clock> ElectionLedger<C> {
    pub fn with_clock(config: LedgerConfig, clock: C) -> Result<Self> {
        config
            .validate()
            .map_err(|err| ElectionError::InvalidInput(err.to_string()))?;

        let snapshot = LedgerSnapshot {
            roles: RoleRegistry::new(AdminContext::from(&config)),
            voters: VoterRegistry::new(config.min_voter_age),
            candidates: CandidateRegistry::new(CandidatePolicy::from(&config)),
            tally: ElectionTally::new(config.election_window),
            balances: Balances::new(),
            config,
        };

        info!(
            commissioner = %snapshot.config.commissioner,
            start = snapshot.config.election_window.start,
            end = snapshot.config.election_window.end,
            "election ledger created"
        );

        Ok(Self::assemble(snapshot, clock))
    }

    fn assemble(snapshot: LedgerSnapshot, clock: C) -> Self {
        Self {
            config: snapshot.config,
            roles: snapshot.roles,
            voters: snapshot.voters,
            candidates: snapshot.candidates,
            tally: snapshot.tally,
            balances: snapshot.balances,
            clock,
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn add_observer(&mut self, observer: impl EventObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn publish(&mut self, event: Event) {
        for observer in self.observers.iter_mut() {
            observer.notify(&event);
        }
    }

    // Host accounts

    /// Credits an account from outside the election, the way a faucet or
    /// transfer on the host would.
    pub fn fund_account(&mut self, account: Address, amount: Balance) -> Result<Balance> {
        self.balances.credit(&account, amount)?;
        self.publish(Event::AccountFunded { account, amount });

        Ok(self.balances.balance_of(&account))
    }

    pub fn balance_of(&self, account: &Address) -> Balance {
        self.balances.balance_of(account)
    }

    // Roles

    pub fn appoint_officer(
        &mut self,
        caller: &Address,
        account: Address,
        name: impl Into<String>,
        constituency: ConstituencyId,
    ) -> Result<Officer> {
        let reassigned = self.roles.is_officer(&account);
        let officer = self
            .roles
            .appoint_officer(caller, account, name, constituency)?;

        self.publish(Event::OfficerAppointed(OfficerAppointment {
            account,
            constituency,
            reassigned,
        }));

        Ok(officer)
    }

    pub fn is_officer(&self, account: &Address) -> bool {
        self.roles.is_officer(account)
    }

    pub fn officer(&self, account: &Address) -> Result<&Officer> {
        self.roles.officer(account)
    }

    pub fn all_officers(&self) -> Vec<Address> {
        self.roles.all_officers()
    }

    pub fn officer_count(&self) -> usize {
        self.roles.officer_count()
    }

    pub fn commissioner(&self) -> Address {
        self.roles.commissioner()
    }

    pub fn is_commissioner(&self, account: &Address) -> bool {
        self.roles.is_commissioner(account)
    }

    // Voters

    pub fn register_as_voter(
        &mut self,
        caller: &Address,
        registration: VoterRegistration,
    ) -> Result<Voter> {
        let voter = self.voters.register_as_voter(caller, registration)?;

        self.publish(Event::VoterRegistered {
            voter_id: voter.id,
            account: voter.account,
            constituency: voter.constituency,
        });

        Ok(voter)
    }

    pub fn verify_voter(
        &mut self,
        caller: &Address,
        account: &Address,
        expected_national_id_hash: &NationalIdHash,
        expected_external_voter_id: &str,
        decision: bool,
    ) -> Result<bool> {
        let allowed = self.voters.verify_voter(
            &self.roles,
            caller,
            account,
            expected_national_id_hash,
            expected_external_voter_id,
            decision,
        )?;

        self.publish(Event::VoterReviewed(Attestation {
            subject: *account,
            officer: *caller,
            approved: decision,
        }));

        Ok(allowed)
    }

    pub fn bulk_verify_voters(
        &mut self,
        caller: &Address,
        accounts: &[Address],
        decisions: &[bool],
    ) -> Result<usize> {
        let verified = self
            .voters
            .bulk_verify_voters(&self.roles, caller, accounts, decisions)?;

        for (account, decision) in accounts.iter().zip(decisions) {
            self.publish(Event::VoterReviewed(Attestation {
                subject: *account,
                officer: *caller,
                approved: *decision,
            }));
        }

        Ok(verified)
    }

    pub fn voter_by_account(&self, account: &Address) -> Result<&Voter> {
        self.voters.voter_by_account(account)
    }

    pub fn voter_by_id(&self, id: VoterId) -> Result<&Voter> {
        self.voters.voter_by_id(id)
    }

    pub fn all_voters(&self) -> Vec<Address> {
        self.voters.all_voters()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.voter_count()
    }

    pub fn voters_by_constituency(&self, constituency: ConstituencyId) -> Vec<&Voter> {
        self.voters.voters_by_constituency(constituency)
    }

    pub fn voter_statistics(&self) -> VoterStatistics {
        self.voters.statistics()
    }

    // Candidates

    /// Registers the caller as a candidate, moving `payment` from the
    /// caller's account into escrow.
    pub fn register_candidate(
        &mut self,
        caller: &Address,
        application: CandidateApplication,
        payment: Balance,
    ) -> Result<Candidate> {
        self.candidates
            .check_application(caller, &application, payment)?;

        let available = self.balances.balance_of(caller);
        if available < payment {
            return Err(ElectionError::InsufficientFunds {
                account: *caller,
                required: payment,
                available,
            });
        }

        let candidate = self
            .candidates
            .register_candidate(caller, application, payment)?;
        self.balances.debit(caller, payment)?;

        self.publish(Event::CandidateRegistered {
            candidate_id: candidate.id,
            account: candidate.account,
            constituency: candidate.constituency,
            deposit: candidate.security_deposit,
        });

        Ok(candidate)
    }

    pub fn verify_candidate(
        &mut self,
        caller: &Address,
        account: &Address,
        decision: bool,
    ) -> Result<bool> {
        let verified = self
            .candidates
            .verify_candidate(&self.roles, caller, account, decision)?;

        self.publish(Event::CandidateReviewed(Attestation {
            subject: *account,
            officer: *caller,
            approved: decision,
        }));

        Ok(verified)
    }

    /// Deletes a candidate and refunds its deposit. Deposits of a completed
    /// election are only released through [`Self::settle_deposits`].
    pub fn remove_candidate(&mut self, caller: &Address, account: &Address) -> Result<Candidate> {
        let phase = self.phase();
        if phase == ElectionPhase::Completed {
            return Err(ElectionError::NotActive(phase));
        }

        let removed = self.candidates.remove_candidate(
            &self.roles,
            caller,
            account,
            &mut self.balances,
        )?;

        self.publish(Event::CandidateRemoved(DepositRelease {
            candidate_id: removed.id,
            payee: removed.account,
            amount: removed.security_deposit,
        }));

        Ok(removed)
    }

    pub fn candidate_id_by_account(&self, account: &Address) -> Result<CandidateId> {
        self.candidates.candidate_id_by_account(account)
    }

    pub fn candidate_by_account(&self, account: &Address) -> Result<&Candidate> {
        self.candidates.candidate_by_account(account)
    }

    pub fn candidate_details(&self, id: CandidateId) -> Result<&Candidate> {
        self.candidates.candidate_details(id)
    }

    pub fn all_candidates(&self) -> Vec<Address> {
        self.candidates.all_candidates()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.candidate_count()
    }

    pub fn candidates_by_constituency(&self, constituency: ConstituencyId) -> Vec<&Candidate> {
        self.candidates.candidates_by_constituency(constituency)
    }

    pub fn candidate_statistics(&self) -> CandidateStatistics {
        self.candidates.statistics()
    }

    pub fn escrowed_total(&self) -> Balance {
        self.candidates.escrowed_total()
    }

    // Voting

    /// Casts the caller's ballot. `voter_id` must be the caller's own.
    pub fn register_vote(
        &mut self,
        caller: &Address,
        voter_id: VoterId,
        candidate_id: CandidateId,
    ) -> Result<VoteReceipt> {
        self.vote(caller, Some(voter_id), candidate_id)
    }

    pub fn cast_vote(&mut self, caller: &Address, candidate_id: CandidateId) -> Result<VoteReceipt> {
        self.vote(caller, None, candidate_id)
    }

    fn vote(
        &mut self,
        caller: &Address,
        voter_id: Option<VoterId>,
        candidate_id: CandidateId,
    ) -> Result<VoteReceipt> {
        let now = self.clock.now();
        let receipt = self.tally.register_vote(
            now,
            caller,
            voter_id,
            candidate_id,
            &mut self.voters,
            &self.candidates,
        )?;

        self.publish(Event::VoteCast {
            voter_id: receipt.voter_id,
            constituency: receipt.constituency,
        });

        Ok(receipt)
    }

    pub fn vote_count(&self, candidate_id: CandidateId) -> VoteCount {
        self.tally.vote_count(candidate_id)
    }

    pub fn total_votes(&self) -> VoteCount {
        self.tally.total_votes()
    }

    pub fn election_results(&self, constituency: Option<ConstituencyId>) -> Result<ElectionResults> {
        self.tally
            .election_results(self.clock.now(), constituency, &self.candidates)
    }

    pub fn election_status(&self) -> ElectionStatus {
        self.tally.election_status(self.clock.now())
    }

    pub fn phase(&self) -> ElectionPhase {
        self.tally.phase(self.clock.now())
    }

    // Lifecycle

    pub fn pause_election(&mut self, caller: &Address) -> Result<()> {
        let now = self.clock.now();
        self.tally.pause(&self.roles, caller, now)?;
        self.publish_lifecycle(LifecycleAction::Paused, now);
        Ok(())
    }

    pub fn resume_election(&mut self, caller: &Address) -> Result<()> {
        let now = self.clock.now();
        self.tally.resume(&self.roles, caller, now)?;
        self.publish_lifecycle(LifecycleAction::Resumed, now);
        Ok(())
    }

    pub fn cancel_election(&mut self, caller: &Address) -> Result<()> {
        let now = self.clock.now();
        self.tally.cancel(&self.roles, caller, now)?;
        self.publish_lifecycle(LifecycleAction::Cancelled, now);
        Ok(())
    }

    pub fn close_election(&mut self, caller: &Address) -> Result<()> {
        let now = self.clock.now();
        self.tally.close(&self.roles, caller, now)?;
        self.publish_lifecycle(LifecycleAction::Closed, now);
        Ok(())
    }

    fn publish_lifecycle(&mut self, action: LifecycleAction, at: Timestamp) {
        self.publish(Event::ElectionLifecycleChanged(LifecycleChange { action, at }));
    }

    // Settlement

    /// Releases every remaining deposit once the election is over.
    ///
    /// After a completed election a candidate is refunded when its share of
    /// the votes cast in its constituency reaches the configured threshold,
    /// or when nobody voted there; otherwise the deposit goes to the
    /// commissioner. A cancelled election refunds everyone. Settled deposits
    /// drop to zero, so settling twice pays nothing the second time.
    pub fn settle_deposits(&mut self, caller: &Address) -> Result<SettlementReport> {
        require_commissioner(&self.roles, caller, "settle deposits")?;

        let phase = self.phase();
        if !matches!(phase, ElectionPhase::Completed | ElectionPhase::Cancelled) {
            return Err(ElectionError::NotActive(phase));
        }

        let commissioner = self.roles.commissioner();
        let threshold = Balance::from(self.config.deposit_refund_threshold_bps);

        let mut candidates = self.candidates.clone();
        let mut balances = self.balances.clone();
        let mut report = SettlementReport::default();

        for candidate in self.candidates.all_candidates() {
            let record = self.candidates.candidate_by_account(&candidate)?;
            if record.security_deposit == 0 {
                continue;
            }
            let (candidate_id, constituency) = (record.id, record.constituency);

            let constituency_votes = Balance::from(self.tally.constituency_total(constituency));
            let candidate_votes = Balance::from(self.tally.vote_count(candidate_id));
            let refund = phase == ElectionPhase::Cancelled
                || constituency_votes == 0
                || candidate_votes * Balance::from(BASIS_POINTS) >= threshold * constituency_votes;

            let payee = if refund { candidate } else { commissioner };
            let amount = candidates.release_deposit(&candidate, &payee, &mut balances)?;
            let release = DepositRelease {
                candidate_id,
                payee,
                amount,
            };

            if refund {
                report.refunded.push(release);
            } else {
                report.forfeited.push(release);
            }
        }

        self.candidates = candidates;
        self.balances = balances;

        info!(
            refunded = report.refunded.len(),
            forfeited = report.forfeited.len(),
            "deposits settled"
        );

        for release in report.refunded.clone() {
            self.publish(Event::DepositRefunded(release));
        }
        for release in report.forfeited.clone() {
            self.publish(Event::DepositForfeited(release));
        }

        Ok(report)
    }

    // Snapshots

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            config: self.config.clone(),
            roles: self.roles.clone(),
            voters: self.voters.clone(),
            candidates: self.candidates.clone(),
            tally: self.tally.clone(),
            balances: self.balances.clone(),
        }
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot, clock: C) -> Result<Self> {
        snapshot
            .config
            .validate()
            .map_err(|err| ElectionError::Snapshot(err.to_string()))?;

        if snapshot.roles.commissioner() != snapshot.config.commissioner {
            return Err(ElectionError::Snapshot(format!(
                "snapshot commissioner {} does not match configured commissioner {}",
                snapshot.roles.commissioner(),
                snapshot.config.commissioner
            )));
        }

        if snapshot.tally.counted_votes() != snapshot.tally.total_votes() {
            return Err(ElectionError::Snapshot(
                "vote counts do not add up to the total".to_string(),
            ));
        }

        if snapshot.tally.window() != &snapshot.config.election_window {
            return Err(ElectionError::Snapshot(
                "tally window differs from the configured election window".to_string(),
            ));
        }

        if snapshot.voters.min_voter_age() != snapshot.config.min_voter_age
            || snapshot.candidates.policy() != &CandidatePolicy::from(&snapshot.config)
        {
            return Err(ElectionError::Snapshot(
                "registry eligibility rules differ from the configuration".to_string(),
            ));
        }

        if !snapshot.candidates.deposits_match_escrow() {
            return Err(ElectionError::Snapshot(
                "escrow does not match the candidates' deposits".to_string(),
            ));
        }

        Ok(Self::assemble(snapshot, clock))
    }

    /// Writes the ledger state as JSON to `path`.
    pub fn save_to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(&self.snapshot())
            .map_err(|err| ElectionError::Snapshot(err.to_string()))?;

        fs::write(path.as_ref(), serialized)
            .map_err(|err| ElectionError::Snapshot(err.to_string()))?;

        info!("ledger snapshot written to {}", path.as_ref().display());

        Ok(())
    }

    pub fn restore_from_json(path: impl AsRef<Path>, clock: C) -> Result<Self> {
        let read =
            fs::read(path.as_ref()).map_err(|err| ElectionError::Snapshot(err.to_string()))?;

        let snapshot: LedgerSnapshot = serde_json::from_slice(&read)
            .map_err(|err| ElectionError::Snapshot(err.to_string()))?;

        let ledger = Self::from_snapshot(snapshot, clock)?;
        if ledger.phase() == ElectionPhase::Cancelled {
            warn!("restored a cancelled election");
        }

        Ok(ledger)
    }
}

impl<C: Clock> fmt::Debug for ElectionLedger<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElectionLedger")
            .field("commissioner", &self.config.commissioner)
            .field("officers", &self.roles.officer_count())
            .field("voters", &self.voters.voter_count())
            .field("candidates", &self.candidates.candidate_count())
            .field("total_votes", &self.tally.total_votes())
            .field("observers", &self.observers.len())
            .finish()
    }
}
