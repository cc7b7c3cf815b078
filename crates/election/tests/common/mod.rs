#![allow(dead_code)]

use ballot_config::{ElectionWindow, LedgerConfig, LedgerConfigBuilder};
use election::{CandidateApplication, ElectionLedger, ManualClock, VoterRegistration};
use primitives::{Address, Balance, ConstituencyId, NationalIdHash, Timestamp};

pub const COIN: Balance = 1_000;
pub const START: Timestamp = 1_000;
pub const END: Timestamp = 2_000;

pub fn config() -> LedgerConfig {
    LedgerConfigBuilder::default()
        .commissioner(Address::from_seed("commissioner"))
        .election_window(ElectionWindow::new(START, END))
        .base_units_per_coin(COIN as u64)
        .build()
        .unwrap()
}

/// A ledger with officers for constituencies 1 and 2, clock inside the
/// voting window.
pub struct Election {
    pub ledger: ElectionLedger<ManualClock>,
    pub commissioner: Address,
    pub officer_c1: Address,
    pub officer_c2: Address,
}

impl Election {
    pub fn new() -> Self {
        let mut ledger = ElectionLedger::with_manual_clock(config(), START + 1).unwrap();
        let commissioner = ledger.commissioner();
        let officer_c1 = Address::from_seed("officer-c1");
        let officer_c2 = Address::from_seed("officer-c2");

        ledger
            .appoint_officer(&commissioner, officer_c1, "Officer C1", 1)
            .unwrap();
        ledger
            .appoint_officer(&commissioner, officer_c2, "Officer C2", 2)
            .unwrap();

        Self {
            ledger,
            commissioner,
            officer_c1,
            officer_c2,
        }
    }

    pub fn officer_for(&self, constituency: ConstituencyId) -> Address {
        match constituency {
            1 => self.officer_c1,
            _ => self.officer_c2,
        }
    }

    pub fn register_voter(&mut self, seed: &str, constituency: ConstituencyId) -> Address {
        let account = Address::from_seed(seed);
        self.ledger
            .register_as_voter(&account, voter_registration(seed, 25, constituency))
            .unwrap();
        account
    }

    pub fn verified_voter(&mut self, seed: &str, constituency: ConstituencyId) -> Address {
        let account = self.register_voter(seed, constituency);
        let officer = self.officer_for(constituency);
        self.ledger
            .verify_voter(
                &officer,
                &account,
                &national_id(seed),
                &external_id(seed),
                true,
            )
            .unwrap();
        account
    }

    pub fn register_candidate(&mut self, seed: &str, constituency: ConstituencyId) -> Address {
        let account = Address::from_seed(seed);
        self.ledger.fund_account(account, 10 * COIN).unwrap();
        self.ledger
            .register_candidate(&account, candidate_application(seed, 1, constituency), COIN)
            .unwrap();
        account
    }

    pub fn verified_candidate(&mut self, seed: &str, constituency: ConstituencyId) -> Address {
        let account = self.register_candidate(seed, constituency);
        let officer = self.officer_for(constituency);
        self.ledger
            .verify_candidate(&officer, &account, true)
            .unwrap();
        account
    }

    pub fn candidate_id(&self, account: &Address) -> u64 {
        self.ledger.candidate_id_by_account(account).unwrap()
    }
}

pub fn national_id(seed: &str) -> NationalIdHash {
    NationalIdHash::from_bytes(&seed.as_bytes()[..seed.len().min(12)]).unwrap()
}

pub fn external_id(seed: &str) -> String {
    format!("EXT-{seed}")
}

pub fn voter_registration(seed: &str, age: u8, constituency: ConstituencyId) -> VoterRegistration {
    VoterRegistration {
        name: seed.to_string(),
        age,
        national_id_hash: national_id(seed),
        external_voter_id: external_id(seed),
        constituency,
    }
}

pub fn candidate_application(
    seed: &str,
    declared_deposit: u64,
    constituency: ConstituencyId,
) -> CandidateApplication {
    CandidateApplication {
        name: seed.to_string(),
        party: "Independent".to_string(),
        declared_deposit,
        age: 40,
        constituency,
    }
}
