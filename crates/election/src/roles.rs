use ballot_config::LedgerConfig;
use indexmap::IndexMap;
use primitives::{Address, ConstituencyId, OfficerId, FIRST_SEQUENCE_ID, MIN_CONSTITUENCY_ID};
use serde::{Deserialize, Serialize};
use telemetry::info;

use crate::{ElectionError, Result, RoleLookup};

/// Holds the commissioner identity, fixed when the registry is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminContext {
    commissioner: Address,
}

impl AdminContext {
    pub fn new(commissioner: Address) -> Self {
        Self { commissioner }
    }

    pub fn commissioner(&self) -> Address {
        self.commissioner
    }
}

impl From<&LedgerConfig> for AdminContext {
    fn from(config: &LedgerConfig) -> Self {
        Self::new(config.commissioner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    pub id: OfficerId,
    pub account: Address,
    pub name: String,
    pub constituency: ConstituencyId,
}

/// Officer appointments. Appointing an account that already is an officer
/// overwrites its name and constituency but keeps its id; any number of
/// officers may serve the same constituency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRegistry {
    admin: AdminContext,
    officers: IndexMap<Address, Officer>,
    next_officer_id: OfficerId,
}

impl RoleRegistry {
    pub fn new(admin: AdminContext) -> Self {
        Self {
            admin,
            officers: IndexMap::new(),
            next_officer_id: FIRST_SEQUENCE_ID,
        }
    }

    pub fn appoint_officer(
        &mut self,
        caller: &Address,
        account: Address,
        name: impl Into<String>,
        constituency: ConstituencyId,
    ) -> Result<Officer> {
        require_commissioner(&*self, caller, "appoint officers")?;

        let name = name.into();
        if name.trim().is_empty() {
            return Err(ElectionError::InvalidInput(
                "officer name must not be empty".to_string(),
            ));
        }

        if constituency < MIN_CONSTITUENCY_ID {
            return Err(ElectionError::InvalidInput(format!(
                "constituency must be at least {MIN_CONSTITUENCY_ID}"
            )));
        }

        let id = match self.officers.get(&account) {
            Some(existing) => existing.id,
            None => {
                let id = self.next_officer_id;
                self.next_officer_id += 1;
                id
            },
        };

        let officer = Officer {
            id,
            account,
            name,
            constituency,
        };

        self.officers.insert(account, officer.clone());

        info!(officer = %account, constituency, "officer appointed");

        Ok(officer)
    }

    pub fn is_officer(&self, account: &Address) -> bool {
        self.officers.contains_key(account)
    }

    pub fn officer(&self, account: &Address) -> Result<&Officer> {
        self.officers
            .get(account)
            .ok_or_else(|| ElectionError::NotFound(format!("officer {account}")))
    }

    pub fn commissioner(&self) -> Address {
        self.admin.commissioner()
    }

    /// Officer accounts in appointment order.
    pub fn all_officers(&self) -> Vec<Address> {
        self.officers.keys().copied().collect()
    }

    pub fn officer_count(&self) -> usize {
        self.officers.len()
    }
}

impl RoleLookup for RoleRegistry {
    fn is_commissioner(&self, account: &Address) -> bool {
        *account == self.admin.commissioner()
    }

    fn officer_constituency(&self, account: &Address) -> Option<ConstituencyId> {
        self.officers.get(account).map(|officer| officer.constituency)
    }
}

pub(crate) fn require_commissioner(
    roles: &dyn RoleLookup,
    caller: &Address,
    action: &'static str,
) -> Result<()> {
    if !roles.is_commissioner(caller) {
        return Err(ElectionError::Unauthorized {
            caller: *caller,
            action,
        });
    }

    Ok(())
}

/// Resolves the constituency the caller serves as officer.
pub(crate) fn require_officer(
    roles: &dyn RoleLookup,
    caller: &Address,
    action: &'static str,
) -> Result<ConstituencyId> {
    roles
        .officer_constituency(caller)
        .ok_or(ElectionError::Unauthorized {
            caller: *caller,
            action,
        })
}

pub(crate) fn require_same_constituency(
    officer: ConstituencyId,
    subject: ConstituencyId,
) -> Result<()> {
    if officer != subject {
        return Err(ElectionError::ConstituencyMismatch {
            expected: officer,
            found: subject,
        });
    }

    Ok(())
}
