use std::{fmt::Display, str::FromStr};

/// Where a ledger is running. Rehearsals are mock elections run by officials
/// before polling day; they behave like a live deployment but their results
/// carry no weight.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deployment {
    #[default]
    Development,
    Rehearsal,
    Live,
}

pub const BALLOT_DEPLOYMENT_VAR_NAME: &str = "BALLOT_DEPLOYMENT";
pub const BALLOT_PRETTY_PRINT_LOGS_VAR_NAME: &str = "BALLOT_PRETTY_PRINT_LOGS";

impl Deployment {
    /// Reads `BALLOT_DEPLOYMENT`. Unset or unrecognised values mean
    /// development.
    pub fn current() -> Self {
        std::env::var(BALLOT_DEPLOYMENT_VAR_NAME)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Deployment::Development)
    }
}

pub fn get_pretty_print_logs() -> bool {
    std::env::var(BALLOT_PRETTY_PRINT_LOGS_VAR_NAME)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(false)
}

impl Display for Deployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deployment::Development => write!(f, "development"),
            Deployment::Rehearsal => write!(f, "rehearsal"),
            Deployment::Live => write!(f, "live"),
        }
    }
}

impl FromStr for Deployment {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Deployment::Development),
            "rehearsal" | "mock" => Ok(Deployment::Rehearsal),
            "live" => Ok(Deployment::Live),
            _ => Err(crate::Error::InvalidDeployment(s.to_string())),
        }
    }
}
