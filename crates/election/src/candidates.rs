use std::collections::BTreeMap;

use ballot_config::LedgerConfig;
use indexmap::IndexMap;
use primitives::{
    coins_to_base_units, Address, Balance, CandidateId, Coins, ConstituencyId,
    BASE_UNITS_PER_COIN, DEFAULT_MIN_CANDIDATE_AGE, DEFAULT_MIN_SECURITY_DEPOSIT,
    FIRST_SEQUENCE_ID, MIN_CONSTITUENCY_ID,
};
use serde::{Deserialize, Serialize};
use telemetry::{debug, info};

use crate::{
    roles::{require_officer, require_same_constituency},
    CandidateLookup, ElectionError, Escrow, FundsSink, Result, RoleLookup,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub account: Address,
    pub name: String,
    pub party: String,
    pub age: u8,
    pub constituency: ConstituencyId,
    /// Base units currently held in escrow for this candidate
    pub security_deposit: Balance,
    pub has_registered: bool,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateApplication {
    pub name: String,
    pub party: String,
    /// Whole coins; the attached payment must equal this in base units
    pub declared_deposit: Coins,
    pub age: u8,
    pub constituency: ConstituencyId,
}

/// Eligibility rules applied to candidate applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePolicy {
    pub min_candidate_age: u8,
    pub min_security_deposit: Coins,
    pub base_units_per_coin: Balance,
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        Self {
            min_candidate_age: DEFAULT_MIN_CANDIDATE_AGE,
            min_security_deposit: DEFAULT_MIN_SECURITY_DEPOSIT,
            base_units_per_coin: BASE_UNITS_PER_COIN,
        }
    }
}

impl From<&LedgerConfig> for CandidatePolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            min_candidate_age: config.min_candidate_age,
            min_security_deposit: config.min_security_deposit,
            base_units_per_coin: config.base_units_per_coin(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateStatistics {
    pub total_registered: usize,
    pub total_verified: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRegistry {
    candidates: IndexMap<Address, Candidate>,
    ids: BTreeMap<CandidateId, Address>,
    next_candidate_id: CandidateId,
    escrow: Escrow,
    policy: CandidatePolicy,
}

impl CandidateRegistry {
    pub fn new(policy: CandidatePolicy) -> Self {
        Self {
            candidates: IndexMap::new(),
            ids: BTreeMap::new(),
            next_candidate_id: FIRST_SEQUENCE_ID,
            escrow: Escrow::new(),
            policy,
        }
    }

    /// Registers the caller as a candidate and moves `payment` into escrow.
    /// The payment must already have left the caller's account.
    pub fn register_candidate(
        &mut self,
        caller: &Address,
        application: CandidateApplication,
        payment: Balance,
    ) -> Result<Candidate> {
        self.check_application(caller, &application, payment)?;
        self.escrow.hold(*caller, payment)?;

        let candidate = Candidate {
            id: self.next_candidate_id,
            account: *caller,
            name: application.name,
            party: application.party,
            age: application.age,
            constituency: application.constituency,
            security_deposit: payment,
            has_registered: true,
            is_verified: false,
        };

        self.next_candidate_id += 1;
        self.ids.insert(candidate.id, *caller);
        self.candidates.insert(*caller, candidate.clone());

        info!(
            candidate = %caller,
            id = candidate.id,
            constituency = candidate.constituency,
            deposit = %payment,
            "candidate registered"
        );

        Ok(candidate)
    }

    /// Runs every registration check without touching any state.
    pub fn check_application(
        &self,
        caller: &Address,
        application: &CandidateApplication,
        payment: Balance,
    ) -> Result<()> {
        if self.candidates.contains_key(caller) {
            return Err(ElectionError::AlreadyRegistered(*caller));
        }

        let expected = self.required_payment(application)?;
        if payment != expected {
            return Err(ElectionError::DepositMismatch {
                expected,
                attached: payment,
            });
        }

        Ok(())
    }

    /// Validates an application and converts its declared deposit into the
    /// payment it must carry.
    pub fn required_payment(&self, application: &CandidateApplication) -> Result<Balance> {
        if application.age < self.policy.min_candidate_age {
            return Err(ElectionError::InvalidInput(format!(
                "candidate must be at least {} years old",
                self.policy.min_candidate_age
            )));
        }

        if application.name.trim().is_empty() || application.party.trim().is_empty() {
            return Err(ElectionError::InvalidInput(
                "candidate name and party must not be empty".to_string(),
            ));
        }

        if application.constituency < MIN_CONSTITUENCY_ID {
            return Err(ElectionError::InvalidInput(format!(
                "constituency must be at least {MIN_CONSTITUENCY_ID}"
            )));
        }

        if application.declared_deposit < self.policy.min_security_deposit {
            return Err(ElectionError::InvalidInput(format!(
                "security deposit must be at least {} coins",
                self.policy.min_security_deposit
            )));
        }

        coins_to_base_units(application.declared_deposit, self.policy.base_units_per_coin)
            .map_err(|_| ElectionError::Overflow("deposit conversion"))
    }

    pub fn verify_candidate(
        &mut self,
        roles: &dyn RoleLookup,
        caller: &Address,
        account: &Address,
        decision: bool,
    ) -> Result<bool> {
        let officer_constituency = require_officer(roles, caller, "verify candidates")?;

        let candidate = self
            .candidates
            .get_mut(account)
            .ok_or_else(|| ElectionError::NotFound(format!("candidate {account}")))?;

        require_same_constituency(officer_constituency, candidate.constituency)?;

        if decision {
            if candidate.is_verified {
                return Err(ElectionError::AlreadyVerified(*account));
            }
            candidate.is_verified = true;
            info!(candidate = %account, officer = %caller, "candidate verified");
        } else {
            debug!(candidate = %account, officer = %caller, "candidate review declined");
        }

        Ok(candidate.is_verified)
    }

    /// Refunds the escrowed deposit to the candidate and deletes the record.
    /// Votes already counted for the candidate stay in the tally.
    pub fn remove_candidate(
        &mut self,
        roles: &dyn RoleLookup,
        caller: &Address,
        account: &Address,
        sink: &mut dyn FundsSink,
    ) -> Result<Candidate> {
        let officer_constituency = require_officer(roles, caller, "remove candidates")?;

        let candidate = self
            .candidates
            .get(account)
            .ok_or_else(|| ElectionError::NotFound(format!("candidate {account}")))?;

        require_same_constituency(officer_constituency, candidate.constituency)?;

        sink.credit(account, self.escrow.held_by(account))?;
        self.escrow.release(account);

        let candidate = self
            .candidates
            .shift_remove(account)
            .ok_or_else(|| ElectionError::NotFound(format!("candidate {account}")))?;
        self.ids.remove(&candidate.id);

        info!(candidate = %account, id = candidate.id, refunded = %candidate.security_deposit, "candidate removed");

        Ok(candidate)
    }

    /// Pays a candidate's escrowed deposit to `payee` and zeroes it on the
    /// record. Returns the amount paid.
    pub(crate) fn release_deposit(
        &mut self,
        account: &Address,
        payee: &Address,
        sink: &mut dyn FundsSink,
    ) -> Result<Balance> {
        let candidate = self
            .candidates
            .get_mut(account)
            .ok_or_else(|| ElectionError::NotFound(format!("candidate {account}")))?;

        let amount = self.escrow.held_by(account);
        sink.credit(payee, amount)?;
        self.escrow.release(account);
        candidate.security_deposit = 0;

        Ok(amount)
    }

    pub fn candidate_id_by_account(&self, account: &Address) -> Result<CandidateId> {
        self.candidate_by_account(account).map(|candidate| candidate.id)
    }

    pub fn candidate_by_account(&self, account: &Address) -> Result<&Candidate> {
        self.candidates
            .get(account)
            .ok_or_else(|| ElectionError::NotFound(format!("candidate {account}")))
    }

    pub fn candidate_details(&self, id: CandidateId) -> Result<&Candidate> {
        self.candidate(id)
            .ok_or_else(|| ElectionError::NotFound(format!("candidate id {id}")))
    }

    /// Candidate accounts in registration order.
    pub fn all_candidates(&self) -> Vec<Address> {
        self.candidates.keys().copied().collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn candidates_by_constituency(&self, constituency: ConstituencyId) -> Vec<&Candidate> {
        self.candidates
            .values()
            .filter(|candidate| candidate.constituency == constituency)
            .collect()
    }

    pub fn statistics(&self) -> CandidateStatistics {
        CandidateStatistics {
            total_registered: self.candidates.len(),
            total_verified: self
                .candidates
                .values()
                .filter(|candidate| candidate.is_verified)
                .count(),
        }
    }

    pub fn escrowed_total(&self) -> Balance {
        self.escrow.total()
    }

    pub fn policy(&self) -> &CandidatePolicy {
        &self.policy
    }

    /// Whether escrow holds the recorded deposit of every present candidate
    /// and nothing more.
    pub fn deposits_match_escrow(&self) -> bool {
        let recorded: BTreeMap<Address, Balance> = self
            .candidates
            .values()
            .map(|candidate| (candidate.account, candidate.security_deposit))
            .collect();

        self.escrow.holds_exactly(&recorded)
    }
}

impl CandidateLookup for CandidateRegistry {
    fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.ids
            .get(&id)
            .and_then(|account| self.candidates.get(account))
    }

    fn candidates(&self) -> Vec<&Candidate> {
        self.candidates.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdminContext, Balances, RoleRegistry};

    const COIN: Balance = 1_000;

    struct Fixture {
        roles: RoleRegistry,
        candidates: CandidateRegistry,
        officer: Address,
    }

    fn fixture() -> Fixture {
        let commissioner = Address::from_seed("commissioner");
        let officer = Address::from_seed("officer-c1");
        let mut roles = RoleRegistry::new(AdminContext::new(commissioner));
        roles
            .appoint_officer(&commissioner, officer, "Officer C1", 1)
            .unwrap();

        let policy = CandidatePolicy {
            base_units_per_coin: COIN,
            ..Default::default()
        };

        Fixture {
            roles,
            candidates: CandidateRegistry::new(policy),
            officer,
        }
    }

    fn application(constituency: ConstituencyId, declared_deposit: Coins) -> CandidateApplication {
        CandidateApplication {
            name: "Candidate".to_string(),
            party: "Party".to_string(),
            declared_deposit,
            age: 40,
            constituency,
        }
    }

    #[test]
    fn registration_escrows_the_exact_deposit() {
        let mut f = fixture();
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");

        let first = f
            .candidates
            .register_candidate(&alice, application(1, 2), 2 * COIN)
            .unwrap();
        let second = f
            .candidates
            .register_candidate(&bob, application(1, 1), COIN)
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.security_deposit, 2 * COIN);
        assert!(!first.is_verified);
        assert_eq!(f.candidates.escrowed_total(), 3 * COIN);
        assert_eq!(f.candidates.all_candidates(), vec![alice, bob]);
        assert_eq!(f.candidates.candidate_id_by_account(&bob), Ok(2));
    }

    #[test]
    fn mismatched_payment_holds_nothing() {
        let mut f = fixture();
        let alice = Address::from_seed("alice");

        let err = f
            .candidates
            .register_candidate(&alice, application(1, 1), COIN / 2)
            .unwrap_err();

        assert_eq!(
            err,
            ElectionError::DepositMismatch {
                expected: COIN,
                attached: COIN / 2
            }
        );
        assert_eq!(f.candidates.escrowed_total(), 0);
        assert_eq!(f.candidates.candidate_count(), 0);
        assert!(f.candidates.candidate_by_account(&alice).is_err());
    }

    #[test]
    fn registration_validates_input() {
        let mut f = fixture();
        let alice = Address::from_seed("alice");

        let mut young = application(1, 1);
        young.age = 24;
        let mut no_party = application(1, 1);
        no_party.party = " ".to_string();
        let no_constituency = application(0, 1);
        let no_deposit = application(1, 0);

        for bad in [young, no_party, no_constituency, no_deposit] {
            assert!(matches!(
                f.candidates.register_candidate(&alice, bad, COIN),
                Err(ElectionError::InvalidInput(_))
            ));
        }

        f.candidates
            .register_candidate(&alice, application(1, 1), COIN)
            .unwrap();
        assert_eq!(
            f.candidates
                .register_candidate(&alice, application(1, 1), COIN)
                .unwrap_err(),
            ElectionError::AlreadyRegistered(alice)
        );
        assert_eq!(f.candidates.escrowed_total(), COIN);
    }

    #[test]
    fn verification_is_scoped_and_monotonic() {
        let mut f = fixture();
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");
        f.candidates
            .register_candidate(&alice, application(1, 1), COIN)
            .unwrap();
        f.candidates
            .register_candidate(&bob, application(2, 1), COIN)
            .unwrap();

        assert!(matches!(
            f.candidates.verify_candidate(&f.roles, &alice, &alice, true),
            Err(ElectionError::Unauthorized { .. })
        ));
        assert!(matches!(
            f.candidates.verify_candidate(&f.roles, &f.officer, &bob, true),
            Err(ElectionError::ConstituencyMismatch { .. })
        ));

        assert!(!f
            .candidates
            .verify_candidate(&f.roles, &f.officer, &alice, false)
            .unwrap());
        assert!(f
            .candidates
            .verify_candidate(&f.roles, &f.officer, &alice, true)
            .unwrap());
        assert_eq!(
            f.candidates
                .verify_candidate(&f.roles, &f.officer, &alice, true)
                .unwrap_err(),
            ElectionError::AlreadyVerified(alice)
        );
        assert!(f
            .candidates
            .verify_candidate(&f.roles, &f.officer, &alice, false)
            .unwrap());

        let stats = f.candidates.statistics();
        assert_eq!(stats.total_registered, 2);
        assert_eq!(stats.total_verified, 1);
    }

    #[test]
    fn removal_refunds_and_deletes() {
        let mut f = fixture();
        let mut balances = Balances::new();
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");
        f.candidates
            .register_candidate(&alice, application(1, 3), 3 * COIN)
            .unwrap();
        f.candidates
            .register_candidate(&bob, application(1, 1), COIN)
            .unwrap();

        let removed = f
            .candidates
            .remove_candidate(&f.roles, &f.officer, &alice, &mut balances)
            .unwrap();

        assert_eq!(removed.id, 1);
        assert_eq!(balances.balance_of(&alice), 3 * COIN);
        assert_eq!(f.candidates.escrowed_total(), COIN);
        assert!(matches!(
            f.candidates.candidate_details(1),
            Err(ElectionError::NotFound(_))
        ));
        assert_eq!(f.candidates.all_candidates(), vec![bob]);
        assert!(matches!(
            f.candidates
                .remove_candidate(&f.roles, &f.officer, &alice, &mut balances),
            Err(ElectionError::NotFound(_))
        ));
    }

    #[test]
    fn removal_outside_constituency_changes_nothing() {
        let mut f = fixture();
        let mut balances = Balances::new();
        let alice = Address::from_seed("alice");
        f.candidates
            .register_candidate(&alice, application(2, 1), COIN)
            .unwrap();

        assert!(matches!(
            f.candidates
                .remove_candidate(&f.roles, &f.officer, &alice, &mut balances),
            Err(ElectionError::ConstituencyMismatch { .. })
        ));
        assert_eq!(balances.balance_of(&alice), 0);
        assert_eq!(f.candidates.escrowed_total(), COIN);
    }

    #[test]
    fn released_deposit_goes_to_payee() {
        let mut f = fixture();
        let mut balances = Balances::new();
        let alice = Address::from_seed("alice");
        let payee = Address::from_seed("payee");
        f.candidates
            .register_candidate(&alice, application(1, 2), 2 * COIN)
            .unwrap();

        let paid = f
            .candidates
            .release_deposit(&alice, &payee, &mut balances)
            .unwrap();

        assert_eq!(paid, 2 * COIN);
        assert_eq!(balances.balance_of(&payee), 2 * COIN);
        assert_eq!(f.candidates.escrowed_total(), 0);
        assert_eq!(
            f.candidates
                .candidate_by_account(&alice)
                .unwrap()
                .security_deposit,
            0
        );
        assert_eq!(
            f.candidates
                .release_deposit(&alice, &payee, &mut balances)
                .unwrap(),
            0
        );
    }
}
