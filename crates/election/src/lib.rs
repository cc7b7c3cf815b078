//! Authorization and integrity core of the election ledger.
//!
//! Four registries cooperate here: [`RoleRegistry`] decides who may act,
//! [`VoterRegistry`] and [`CandidateRegistry`] hold self-registered records
//! that officers verify within their own constituency, and [`ElectionTally`]
//! accepts exactly one ballot per verified voter. [`ElectionLedger`] wires them
//! together the way the host ledger would.
pub mod candidates;
pub mod clock;
pub mod escrow;
pub mod ledger;
pub mod lookup;
pub mod result;
pub mod roles;
pub mod tally;
pub mod voters;

pub use candidates::*;
pub use clock::*;
pub use escrow::*;
pub use ledger::*;
pub use lookup::*;
pub use result::*;
pub use roles::*;
pub use tally::*;
pub use voters::*;
