use serde::{Deserialize, Serialize};

use coinwave_core::DomainError;

/// Account role.
///
/// Modeled as a closed set of variants rather than opaque strings: every
/// behavior difference between plain users, agents, and admins goes through
/// the capability table in [`crate::policy`], never through ad-hoc string
/// comparisons inside operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }

    /// One-time credit granted the first time an account of this role logs in.
    ///
    /// Amounts are in the smallest currency unit.
    pub fn first_login_bonus(&self) -> u64 {
        match self {
            Role::User => 40,
            Role::Agent => 10_000,
            Role::Admin => 0,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::validation(format!(
                "role must be one of: user, agent, admin (got '{other}')"
            ))),
        }
    }
}
