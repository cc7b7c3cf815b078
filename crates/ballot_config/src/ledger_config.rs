use std::path::Path;

use config::{Config, File};
use derive_builder::Builder;
use primitives::{
    Address, Balance, Coins, BASE_UNITS_PER_COIN, BASIS_POINTS, DEFAULT_DEPOSIT_REFUND_THRESHOLD_BPS,
    DEFAULT_MIN_CANDIDATE_AGE, DEFAULT_MIN_SECURITY_DEPOSIT, DEFAULT_MIN_VOTER_AGE,
};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ElectionWindow, Result};

pub const DEFAULT_COMMISSIONER_SEED: &str = "commissioner";

#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The single account allowed to appoint officers and drive the election
    /// lifecycle
    pub commissioner: Address,

    /// Voting window checked on every vote
    #[builder(default)]
    pub election_window: ElectionWindow,

    #[builder(default = "DEFAULT_MIN_VOTER_AGE")]
    pub min_voter_age: u8,

    #[builder(default = "DEFAULT_MIN_CANDIDATE_AGE")]
    pub min_candidate_age: u8,

    /// Minimum declared security deposit, in whole coins
    #[builder(default = "DEFAULT_MIN_SECURITY_DEPOSIT")]
    pub min_security_deposit: Coins,

    /// Host base units per whole coin; attached payments are compared in base
    /// units
    #[builder(default = "BASE_UNITS_PER_COIN as u64")]
    pub base_units_per_coin: u64,

    /// Share of the constituency vote, in basis points, a candidate needs to
    /// get the deposit back at settlement
    #[builder(default = "DEFAULT_DEPOSIT_REFUND_THRESHOLD_BPS")]
    pub deposit_refund_threshold_bps: u16,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            commissioner: Address::from_seed(DEFAULT_COMMISSIONER_SEED),
            election_window: ElectionWindow::default(),
            min_voter_age: DEFAULT_MIN_VOTER_AGE,
            min_candidate_age: DEFAULT_MIN_CANDIDATE_AGE,
            min_security_deposit: DEFAULT_MIN_SECURITY_DEPOSIT,
            base_units_per_coin: BASE_UNITS_PER_COIN as u64,
            deposit_refund_threshold_bps: DEFAULT_DEPOSIT_REFUND_THRESHOLD_BPS,
        }
    }
}

impl LedgerConfig {
    /// Loads a configuration file (TOML, JSON or YAML, picked by extension),
    /// filling every missing key with its default.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let defaults = LedgerConfig::default();

        let s = Config::builder()
            .set_default("commissioner", defaults.commissioner.to_string())?
            .set_default("election_window.start", defaults.election_window.start)?
            .set_default("election_window.end", defaults.election_window.end)?
            .set_default("min_voter_age", u64::from(defaults.min_voter_age))?
            .set_default("min_candidate_age", u64::from(defaults.min_candidate_age))?
            .set_default("min_security_deposit", defaults.min_security_deposit)?
            .set_default("base_units_per_coin", defaults.base_units_per_coin)?
            .set_default(
                "deposit_refund_threshold_bps",
                u64::from(defaults.deposit_refund_threshold_bps),
            )?
            .add_source(File::from(path.as_ref()))
            .build()?;

        let config: LedgerConfig = s.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.election_window.validate()?;

        if self.base_units_per_coin == 0 {
            return Err(ConfigError::Invalid(
                "base_units_per_coin must be positive".to_string(),
            ));
        }

        if self.deposit_refund_threshold_bps > BASIS_POINTS {
            return Err(ConfigError::Invalid(format!(
                "deposit_refund_threshold_bps {} exceeds {BASIS_POINTS}",
                self.deposit_refund_threshold_bps
            )));
        }

        Ok(())
    }

    pub fn base_units_per_coin(&self) -> Balance {
        Balance::from(self.base_units_per_coin)
    }
}
