mod report;
mod script;

use std::path::PathBuf;

use ballot_config::LedgerConfig;
use election::{CandidateApplication, ElectionLedger, ManualClock, VoterRegistration};
use primitives::{coins_to_base_units, NationalIdHash};
use telemetry::{info, warn};

pub use self::script::*;
use self::report::{render, standings, StatusRow, StepRow};
use crate::result::{CliError, Result};

#[derive(clap::Parser, Debug, Clone)]
pub struct RunOpts {
    /// JSON scenario script to replay
    #[clap(value_parser, value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Writes the final ledger state to this file as JSON
    #[clap(long, value_parser, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Stops at the first failing step instead of recording it
    #[clap(long, action, default_value = "false")]
    pub strict: bool,
}

pub fn exec(opts: RunOpts, mut config: LedgerConfig) -> Result<()> {
    let script = Script::from_file(&opts.script)?;

    if let Some(window) = script.window {
        config.election_window = window;
    }

    let start_time = script.start_time.unwrap_or(config.election_window.start);
    let mut ledger = ElectionLedger::with_manual_clock(config, start_time)?;

    info!(steps = script.steps.len(), "replaying {}", opts.script.display());

    let mut rows = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let outcome = match apply(&mut ledger, step) {
            Ok(outcome) => outcome,
            Err(err) if opts.strict => {
                return Err(CliError::StepFailed {
                    step: index + 1,
                    action: step.action().to_string(),
                    reason: err.to_string(),
                });
            },
            Err(err) => {
                warn!(step = index + 1, action = step.action(), "step failed: {err}");
                format!("error: {err}")
            },
        };

        rows.push(StepRow {
            step: index + 1,
            action: step.action(),
            outcome,
        });
    }

    println!("{}", render(rows));

    let results = ledger.election_results(None)?;
    println!(
        "{}",
        render(standings(&results, |id| ledger.candidate_details(id).ok()))
    );
    println!("{}", render(vec![StatusRow::from(&ledger.election_status())]));

    if let Some(path) = opts.snapshot {
        ledger.save_to_json(&path)?;
        println!("snapshot written to {}", path.display());
    }

    Ok(())
}

/// Runs one step and describes what it did.
fn apply(ledger: &mut ElectionLedger<ManualClock>, step: &Step) -> Result<String> {
    let base_units_per_coin = ledger.config().base_units_per_coin();

    let outcome = match step {
        Step::Fund { account, coins } => {
            let amount = coins_to_base_units(*coins, base_units_per_coin)?;
            let balance = ledger.fund_account(account.address(), amount)?;
            format!("balance {balance}")
        },
        Step::AppointOfficer {
            caller,
            account,
            name,
            constituency,
        } => {
            let officer = ledger.appoint_officer(
                &caller.address(),
                account.address(),
                name.clone(),
                *constituency,
            )?;
            format!("officer {} for constituency {}", officer.id, officer.constituency)
        },
        Step::RegisterVoter {
            caller,
            name,
            age,
            national_id,
            external_voter_id,
            constituency,
        } => {
            let registration = VoterRegistration {
                name: name.clone(),
                age: *age,
                national_id_hash: national_id.parse::<NationalIdHash>()?,
                external_voter_id: external_voter_id.clone(),
                constituency: *constituency,
            };
            let voter = ledger.register_as_voter(&caller.address(), registration)?;
            format!("voter {}", voter.id)
        },
        Step::VerifyVoter {
            caller,
            account,
            national_id,
            external_voter_id,
            decision,
        } => {
            let allowed = ledger.verify_voter(
                &caller.address(),
                &account.address(),
                &national_id.parse::<NationalIdHash>()?,
                external_voter_id,
                *decision,
            )?;
            format!("allowed to vote: {allowed}")
        },
        Step::BulkVerifyVoters {
            caller,
            accounts,
            decisions,
        } => {
            let accounts: Vec<_> = accounts.iter().map(AccountRef::address).collect();
            let verified = ledger.bulk_verify_voters(&caller.address(), &accounts, decisions)?;
            format!("{verified} verified")
        },
        Step::RegisterCandidate {
            caller,
            name,
            party,
            declared_deposit,
            age,
            constituency,
            payment,
        } => {
            let payment = match payment {
                Some(raw) => parse_base_units(raw)?,
                None => coins_to_base_units(*declared_deposit, base_units_per_coin)?,
            };
            let application = CandidateApplication {
                name: name.clone(),
                party: party.clone(),
                declared_deposit: *declared_deposit,
                age: *age,
                constituency: *constituency,
            };
            let candidate = ledger.register_candidate(&caller.address(), application, payment)?;
            format!("candidate {}", candidate.id)
        },
        Step::VerifyCandidate {
            caller,
            account,
            decision,
        } => {
            let verified =
                ledger.verify_candidate(&caller.address(), &account.address(), *decision)?;
            format!("verified: {verified}")
        },
        Step::RemoveCandidate { caller, account } => {
            let removed = ledger.remove_candidate(&caller.address(), &account.address())?;
            format!("candidate {} removed, refunded {}", removed.id, removed.security_deposit)
        },
        Step::Vote {
            caller,
            candidate_id,
            voter_id,
        } => {
            let receipt = match voter_id {
                Some(voter_id) => ledger.register_vote(&caller.address(), *voter_id, *candidate_id)?,
                None => ledger.cast_vote(&caller.address(), *candidate_id)?,
            };
            format!("voter {} voted in constituency {}", receipt.voter_id, receipt.constituency)
        },
        Step::Pause { caller } => {
            ledger.pause_election(&caller.address())?;
            "paused".to_string()
        },
        Step::Resume { caller } => {
            ledger.resume_election(&caller.address())?;
            "resumed".to_string()
        },
        Step::Cancel { caller } => {
            ledger.cancel_election(&caller.address())?;
            "cancelled".to_string()
        },
        Step::Close { caller } => {
            ledger.close_election(&caller.address())?;
            "closed".to_string()
        },
        Step::SettleDeposits { caller } => {
            let report = ledger.settle_deposits(&caller.address())?;
            format!(
                "{} refunded, {} forfeited",
                report.refunded.len(),
                report.forfeited.len()
            )
        },
        Step::AdvanceTime { seconds } => {
            let now = ledger.clock().advance(*seconds);
            format!("now {now}, {}", ledger.phase())
        },
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use primitives::Address;

    use super::*;

    fn ledger() -> ElectionLedger<ManualClock> {
        ElectionLedger::with_manual_clock(LedgerConfig::default(), 0).unwrap()
    }

    fn account(label: &str) -> AccountRef {
        AccountRef(label.to_string())
    }

    #[test]
    fn steps_drive_the_ledger() {
        let mut ledger = ledger();
        let steps = vec![
            Step::AppointOfficer {
                caller: account("commissioner"),
                account: account("officer"),
                name: "Officer".to_string(),
                constituency: 1,
            },
            Step::Fund {
                account: account("carol"),
                coins: 2,
            },
            Step::RegisterCandidate {
                caller: account("carol"),
                name: "Carol".to_string(),
                party: "Green".to_string(),
                declared_deposit: 1,
                age: 30,
                constituency: 1,
                payment: None,
            },
            Step::VerifyCandidate {
                caller: account("officer"),
                account: account("carol"),
                decision: true,
            },
            Step::RegisterVoter {
                caller: account("dave"),
                name: "Dave".to_string(),
                age: 20,
                national_id: "0x0102".to_string(),
                external_voter_id: "D-1".to_string(),
                constituency: 1,
            },
            Step::BulkVerifyVoters {
                caller: account("officer"),
                accounts: vec![account("dave")],
                decisions: vec![true],
            },
            Step::Vote {
                caller: account("dave"),
                candidate_id: 1,
                voter_id: Some(1),
            },
        ];

        for step in &steps {
            apply(&mut ledger, step).unwrap();
        }

        assert_eq!(ledger.total_votes(), 1);
        assert_eq!(
            ledger.balance_of(&Address::from_seed("carol")),
            ledger.config().base_units_per_coin()
        );

        let results = ledger.election_results(None).unwrap();
        let rows = standings(&results, |id| ledger.candidate_details(id).ok());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Carol");
        assert_eq!(rows[0].votes, 1);
        assert!(rows[0].winner);
    }

    #[test]
    fn failing_steps_surface_ledger_errors() {
        let mut ledger = ledger();

        let err = apply(
            &mut ledger,
            &Step::Pause {
                caller: account("intruder"),
            },
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Election(_)));
    }

    #[test]
    fn advance_time_moves_the_clock() {
        let mut ledger = ledger();

        let outcome = apply(&mut ledger, &Step::AdvanceTime { seconds: 30 }).unwrap();

        assert_eq!(ledger.now(), 30);
        assert!(outcome.starts_with("now 30"));
    }
}
