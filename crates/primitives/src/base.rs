use crate::Error;

/// Administrative grouping that scopes officers, voters and candidates.
/// Valid values start at 1.
pub type ConstituencyId = u64;
pub type OfficerId = u64;
pub type VoterId = u64;
pub type CandidateId = u64;
pub type VoteCount = u64;

/// Unix time in seconds.
pub type Timestamp = u64;

/// Amount expressed in the host ledger's smallest base unit.
pub type Balance = u128;

/// Whole currency units, as declared by candidates.
pub type Coins = u64;

pub const FIRST_SEQUENCE_ID: u64 = 1;
pub const MIN_CONSTITUENCY_ID: ConstituencyId = 1;
pub const DEFAULT_MIN_VOTER_AGE: u8 = 18;
pub const DEFAULT_MIN_CANDIDATE_AGE: u8 = 25;
pub const DEFAULT_MIN_SECURITY_DEPOSIT: Coins = 1;
pub const BASE_UNITS_PER_COIN: Balance = 1_000_000_000_000_000_000;
pub const BASIS_POINTS: u16 = 10_000;

/// One sixth of the constituency vote, rounded up to the nearest basis point.
pub const DEFAULT_DEPOSIT_REFUND_THRESHOLD_BPS: u16 = 1_667;

// Time-related helper constants
pub const SECOND: Timestamp = 1;
pub const MINUTE: Timestamp = SECOND * 60;
pub const HOUR: Timestamp = MINUTE * 60;
pub const DAY: Timestamp = HOUR * 24;

pub const DEFAULT_BALLOT_DATA_DIR_PATH: &str = ".ballot";

/// Converts whole coins into base units.
pub fn coins_to_base_units(coins: Coins, base_units_per_coin: Balance) -> Result<Balance, Error> {
    Balance::from(coins)
        .checked_mul(base_units_per_coin)
        .ok_or_else(|| Error::AmountOverflow(format!("{coins} coins")))
}
