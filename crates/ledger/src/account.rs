use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coinwave_auth::Role;
use coinwave_core::{AccountId, DomainError, DomainResult};

/// Account status lifecycle.
///
/// Created as `Pending` at signup, moved to `Active` by an admin, and
/// possibly `Blocked` later. Blocked or pending accounts may still be
/// credential-checked but must never be granted a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
    Blocked,
}

/// Draft submitted at signup; the secret has already been hashed by the
/// external credential capability before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDraft {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub role: Role,
    pub credential_hash: String,
}

/// A ledger-held account.
///
/// # Invariants
/// - `balance >= 0` after any committed operation (enforced by the store's
///   atomic delta primitive; the field is unsigned so a violation cannot
///   even be represented).
/// - Identity fields (`id`, `email`, `mobile`) and `role` are immutable
///   post-creation; only `status`, `balance` and `first_login` change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub role: Role,
    pub status: AccountStatus,
    /// Balance in the smallest currency unit.
    pub balance: u64,
    pub credential_hash: String,
    /// Set at signup; cleared exactly once when the first-login bonus is
    /// credited.
    pub first_login: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Materialize a new account from a signup draft.
    pub fn from_draft(id: AccountId, draft: AccountDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            mobile: draft.mobile,
            role: draft.role,
            status: AccountStatus::Pending,
            balance: 0,
            credential_hash: draft.credential_hash,
            first_login: true,
            created_at: now,
        }
    }

    /// Gate for session issuance.
    ///
    /// Pending and blocked accounts may be credential-checked but are never
    /// granted a session.
    pub fn ensure_sessionable(&self) -> DomainResult<()> {
        match self.status {
            AccountStatus::Pending => Err(DomainError::AccountNotActivated),
            AccountStatus::Blocked => Err(DomainError::AccountBlocked),
            AccountStatus::Active => Ok(()),
        }
    }

    /// Whether this account is a valid peer-transfer receiver for a sender
    /// with the given mobile number.
    ///
    /// Agents and admins are not valid receivers, and an account cannot
    /// receive from itself.
    pub fn is_valid_receiver(&self, sender_mobile: &str) -> bool {
        self.role == Role::User && self.mobile != sender_mobile
    }

    /// Identity snapshot for immutable transfer/request records.
    pub fn snapshot(&self) -> PartySnapshot {
        PartySnapshot {
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
        }
    }
}

/// Point-in-time identity of a transfer/request party.
///
/// Records embed a snapshot rather than an account reference so the history
/// stays meaningful even if the account's display name later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub name: String,
    pub email: String,
    pub mobile: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(role: Role) -> AccountDraft {
        AccountDraft {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            mobile: "01711111111".to_string(),
            role,
            credential_hash: "h".to_string(),
        }
    }

    #[test]
    fn new_accounts_start_pending_with_zero_balance() {
        let acc = Account::from_draft(AccountId::new(), draft(Role::User), Utc::now());

        assert_eq!(acc.status, AccountStatus::Pending);
        assert_eq!(acc.balance, 0);
        assert!(acc.first_login);
    }

    #[test]
    fn pending_and_blocked_accounts_cannot_get_sessions() {
        let mut acc = Account::from_draft(AccountId::new(), draft(Role::User), Utc::now());

        assert_eq!(
            acc.ensure_sessionable(),
            Err(DomainError::AccountNotActivated)
        );

        acc.status = AccountStatus::Blocked;
        assert_eq!(acc.ensure_sessionable(), Err(DomainError::AccountBlocked));

        acc.status = AccountStatus::Active;
        assert!(acc.ensure_sessionable().is_ok());
    }

    #[test]
    fn only_user_accounts_with_a_different_mobile_are_valid_receivers() {
        let user = Account::from_draft(AccountId::new(), draft(Role::User), Utc::now());
        let agent = Account::from_draft(AccountId::new(), draft(Role::Agent), Utc::now());

        assert!(user.is_valid_receiver("01722222222"));
        assert!(!user.is_valid_receiver("01711111111")); // own number
        assert!(!agent.is_valid_receiver("01722222222"));
    }
}
