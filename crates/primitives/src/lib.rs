pub mod address;
pub mod base;
pub mod credential;
pub mod deployment;
pub mod error;

pub use address::*;
pub use base::*;
pub use credential::*;
pub use deployment::*;
pub use error::*;
