use coinwave_core::{DomainError, DomainResult};

use crate::Role;

/// A fully resolved principal for authorization decisions.
///
/// Construction is intentionally decoupled from storage and transport: the
/// service layer resolves session claims to an account and derives this
/// from the account's identity and role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }
}

/// Capability required by an operation.
///
/// The closed capability table for the ledger core: admin-only management
/// operations, agent-only request handling, and self-only record access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Requires the admin role (list accounts, list all transfers, set status).
    Admin,
    /// Requires the agent role (list/resolve cash requests addressed to self).
    Agent,
    /// Requires that the principal *is* the named account (own profile, own history).
    SelfOnly { email: String },
}

/// Authorize a principal for a required capability.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Capability) -> DomainResult<()> {
    let granted = match required {
        Capability::Admin => principal.role == Role::Admin,
        Capability::Agent => principal.role == Role::Agent,
        Capability::SelfOnly { email } => principal.email == *email,
    };

    if granted {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_capability_requires_admin_role() {
        let admin = Principal::new("root@example.com", Role::Admin);
        let user = Principal::new("u@example.com", Role::User);

        assert!(authorize(&admin, &Capability::Admin).is_ok());
        assert_eq!(
            authorize(&user, &Capability::Admin),
            Err(DomainError::Forbidden)
        );
    }

    #[test]
    fn agent_capability_requires_agent_role() {
        let agent = Principal::new("ag@example.com", Role::Agent);
        let admin = Principal::new("root@example.com", Role::Admin);

        assert!(authorize(&agent, &Capability::Agent).is_ok());
        assert_eq!(
            authorize(&admin, &Capability::Agent),
            Err(DomainError::Forbidden)
        );
    }

    #[test]
    fn self_only_matches_on_email() {
        let user = Principal::new("u@example.com", Role::User);
        let own = Capability::SelfOnly {
            email: "u@example.com".to_string(),
        };
        let other = Capability::SelfOnly {
            email: "someone@example.com".to_string(),
        };

        assert!(authorize(&user, &own).is_ok());
        assert_eq!(authorize(&user, &other), Err(DomainError::Forbidden));
    }
}
