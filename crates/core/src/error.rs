//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// invariants, conflicts). Store connectivity problems surface as `Store`
/// and terminate the operation; nothing here is retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested account or request record is absent.
    #[error("not found")]
    NotFound,

    /// Signup collided with an existing email or mobile number.
    #[error("account already exists")]
    DuplicateAccount,

    /// The submitted secret did not match the stored credential hash.
    #[error("invalid credentials")]
    InvalidCredential,

    /// The account exists but has not been activated by an admin yet.
    #[error("account not activated")]
    AccountNotActivated,

    /// The account has been blocked and cannot be granted a session.
    #[error("account blocked")]
    AccountBlocked,

    /// A debit would take the balance below zero.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// A cash request was already resolved (terminal states never transition).
    #[error("request already resolved")]
    InvalidTransition,

    /// Role or ownership check failed for the authenticated principal.
    #[error("forbidden")]
    Forbidden,

    /// Session missing, expired, or otherwise invalid.
    #[error("unauthorized")]
    Unauthorized,

    /// A value failed validation (e.g. non-positive amount).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Store-level failure; surfaced to the caller as a generic failure.
    #[error("store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
