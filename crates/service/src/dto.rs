//! Request/response payloads for the operation boundary.

use serde::{Deserialize, Serialize};

use coinwave_auth::Role;

/// Signup payload. The secret is hashed by the credential capability before
/// anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub role: Role,
    pub secret: String,
}

/// Login payload: email or mobile plus the secret. Email takes precedence
/// when both are supplied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub secret: String,
}

/// Peer transfer payload. The sender is the session principal; the secret is
/// re-verified before any balance moves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendMoneyRequest {
    pub receiver_email: String,
    pub amount: u64,
    pub secret: String,
}

/// Result of a two-leg settlement; both legs committed atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettlementOutcome {
    pub user_balance: u64,
    pub agent_balance: u64,
}
