mod election_window;
pub mod ledger_config;
mod result;

pub use election_window::*;
pub use ledger_config::*;
pub use result::*;
