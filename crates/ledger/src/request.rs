use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coinwave_core::{DomainError, DomainResult, RequestId};

use crate::account::PartySnapshot;

/// Cash request status lifecycle.
///
/// `Pending` transitions exactly once to `Accepted` or `Rejected`; both are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// Outcome chosen by the counterparty agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Accepted,
    Rejected,
}

impl From<Resolution> for RequestStatus {
    fn from(value: Resolution) -> Self {
        match value {
            Resolution::Accepted => RequestStatus::Accepted,
            Resolution::Rejected => RequestStatus::Rejected,
        }
    }
}

/// Agent-mediated cash movement request (cash-in or cash-out; same shape,
/// kept in two independent append-only collections).
///
/// # Invariants
/// - `amount` and both identities are immutable after creation; only
///   `status` changes, exactly once.
/// - Only the counterparty agent named on the request may resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashRequest {
    pub id: RequestId,
    pub requester: PartySnapshot,
    pub agent: PartySnapshot,
    pub amount: u64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl CashRequest {
    /// Open a new pending request from a user towards an agent.
    pub fn open(
        requester: PartySnapshot,
        agent: PartySnapshot,
        amount: u64,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if amount == 0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        Ok(Self {
            id: RequestId::new(),
            requester,
            agent,
            amount,
            status: RequestStatus::Pending,
            created_at: now,
        })
    }

    /// Transition out of `Pending`.
    ///
    /// Fails `Forbidden` unless `acting_agent_email` is the counterparty
    /// agent named on the request (the original requester can never resolve
    /// their own request), and `InvalidTransition` if the request has
    /// already been resolved.
    pub fn resolve(&mut self, resolution: Resolution, acting_agent_email: &str) -> DomainResult<()> {
        if self.agent.email != acting_agent_email {
            return Err(DomainError::Forbidden);
        }
        if self.status.is_terminal() {
            return Err(DomainError::InvalidTransition);
        }
        self.status = resolution.into();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(email: &str) -> PartySnapshot {
        PartySnapshot {
            name: email.to_string(),
            email: email.to_string(),
            mobile: "0170000000".to_string(),
        }
    }

    fn pending_request() -> CashRequest {
        CashRequest::open(party("user@example.com"), party("agent@example.com"), 500, Utc::now())
            .unwrap()
    }

    #[test]
    fn requests_open_as_pending() {
        let req = pending_request();
        assert_eq!(req.status, RequestStatus::Pending);
    }

    #[test]
    fn zero_amount_requests_are_rejected() {
        let err = CashRequest::open(party("u@x"), party("a@x"), 0, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn only_the_named_agent_may_resolve() {
        let mut req = pending_request();

        let err = req
            .resolve(Resolution::Accepted, "user@example.com")
            .unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
        assert_eq!(req.status, RequestStatus::Pending);

        req.resolve(Resolution::Accepted, "agent@example.com").unwrap();
        assert_eq!(req.status, RequestStatus::Accepted);
    }

    #[test]
    fn resolved_requests_never_transition_again() {
        let mut req = pending_request();
        req.resolve(Resolution::Rejected, "agent@example.com").unwrap();

        let err = req
            .resolve(Resolution::Accepted, "agent@example.com")
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidTransition);
        assert_eq!(req.status, RequestStatus::Rejected);
    }
}
