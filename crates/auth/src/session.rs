use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed lifetime of an issued session.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Session claims model (transport-agnostic).
///
/// This is the minimal set of claims the ledger core expects once a bearer
/// token has been decoded/verified by whatever transport/security layer is
/// in use. Token encoding and signature verification are intentionally
/// outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the account's email.
    pub sub: String,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Issue claims for an account, valid for the fixed 12-hour window.
    pub fn issue(email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            sub: email.into(),
            issued_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate session claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// is intentionally outside this crate.
pub fn validate_claims(
    claims: &SessionClaims,
    now: DateTime<Utc>,
) -> Result<(), SessionValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(SessionValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(SessionValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(SessionValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_claims_are_valid_for_twelve_hours() {
        let now = Utc::now();
        let claims = SessionClaims::issue("a@example.com", now);

        assert_eq!(claims.expires_at - claims.issued_at, Duration::hours(12));
        assert!(validate_claims(&claims, now).is_ok());
        assert!(validate_claims(&claims, now + Duration::hours(11)).is_ok());
    }

    #[test]
    fn expired_claims_are_rejected() {
        let now = Utc::now();
        let claims = SessionClaims::issue("a@example.com", now);

        let err = validate_claims(&claims, now + Duration::hours(12)).unwrap_err();
        assert_eq!(err, SessionValidationError::Expired);
    }

    #[test]
    fn claims_from_the_future_are_rejected() {
        let now = Utc::now();
        let claims = SessionClaims::issue("a@example.com", now + Duration::hours(1));

        let err = validate_claims(&claims, now).unwrap_err();
        assert_eq!(err, SessionValidationError::NotYetValid);
    }
}
