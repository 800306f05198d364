//! Storage abstractions for the ledger core.
//!
//! The persistent store is modeled as a generic document store with
//! find/insert/update primitives. Balances are the only mutable numeric
//! state and every balance change goes through [`AccountStore`]; transfer
//! and cash-request history is append-only.

pub mod memory;

use std::sync::Arc;

use coinwave_core::{AccountId, DomainResult, RequestId};
use coinwave_ledger::{
    Account, AccountDraft, AccountStatus, CashRequest, FeeRecord, Resolution, TransferRecord,
};

/// Account persistence contract.
///
/// `apply_balance_delta`, `transfer` and `claim_first_login_bonus` are the
/// only balance-mutation primitives, and each is an atomically-checked
/// read-modify-write: two concurrent debits against the same account can
/// never both succeed past the point where the balance would go negative.
pub trait AccountStore: Send + Sync {
    fn find_by_id(&self, id: AccountId) -> DomainResult<Account>;
    fn find_by_email(&self, email: &str) -> DomainResult<Account>;
    fn find_by_mobile(&self, mobile: &str) -> DomainResult<Account>;

    /// Persist a new account. Fails `DuplicateAccount` if the email or
    /// mobile number is already taken.
    fn create(&self, draft: AccountDraft) -> DomainResult<Account>;

    /// Atomically adjust a balance, returning the new value.
    ///
    /// Fails `InsufficientFunds` (with no state change) if a negative delta
    /// would take the balance below zero.
    fn apply_balance_delta(&self, id: AccountId, delta: i64) -> DomainResult<u64>;

    /// Atomically settle a two-leg movement: debit one account and credit
    /// another under a single critical section. Both legs commit or neither
    /// does; there is no partially-applied state to compensate.
    ///
    /// The two accounts must be distinct; an aliased pair would let the
    /// overlapping writes mint money and is rejected as a validation error.
    fn transfer(
        &self,
        debit_id: AccountId,
        debit_amount: u64,
        credit_id: AccountId,
        credit_amount: u64,
    ) -> DomainResult<(u64, u64)>;

    /// Credit the role-specific first-login bonus exactly once.
    ///
    /// Flag check, credit and flag clear happen as one critical section
    /// keyed by account id, so a concurrent duplicate trigger cannot
    /// re-credit. Returns the (possibly unchanged) account.
    fn claim_first_login_bonus(&self, id: AccountId) -> DomainResult<Account>;

    fn set_status(&self, id: AccountId, status: AccountStatus) -> DomainResult<Account>;

    fn list(&self) -> DomainResult<Vec<Account>>;
}

/// Append-only transfer and fee history.
pub trait TransferLog: Send + Sync {
    fn append(&self, record: TransferRecord) -> DomainResult<()>;
    fn append_fee(&self, record: FeeRecord) -> DomainResult<()>;
    fn list_all(&self) -> DomainResult<Vec<TransferRecord>>;
    /// Transfers where the given email is either sender or receiver.
    fn list_for(&self, email: &str) -> DomainResult<Vec<TransferRecord>>;
    fn list_fees(&self) -> DomainResult<Vec<FeeRecord>>;
}

/// Append-only cash request collection (one instance per direction:
/// cash-in and cash-out are independent collections of the same shape).
pub trait CashRequestLog: Send + Sync {
    fn append(&self, request: CashRequest) -> DomainResult<CashRequest>;
    fn find(&self, id: RequestId) -> DomainResult<CashRequest>;
    fn list_for_agent(&self, agent_email: &str) -> DomainResult<Vec<CashRequest>>;

    /// Transition a request out of `Pending`, exactly once, under a single
    /// critical section. Fails `InvalidTransition` if already resolved and
    /// `Forbidden` unless the actor is the counterparty agent.
    fn resolve(
        &self,
        id: RequestId,
        resolution: Resolution,
        acting_agent_email: &str,
    ) -> DomainResult<CashRequest>;
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn find_by_id(&self, id: AccountId) -> DomainResult<Account> {
        (**self).find_by_id(id)
    }

    fn find_by_email(&self, email: &str) -> DomainResult<Account> {
        (**self).find_by_email(email)
    }

    fn find_by_mobile(&self, mobile: &str) -> DomainResult<Account> {
        (**self).find_by_mobile(mobile)
    }

    fn create(&self, draft: AccountDraft) -> DomainResult<Account> {
        (**self).create(draft)
    }

    fn apply_balance_delta(&self, id: AccountId, delta: i64) -> DomainResult<u64> {
        (**self).apply_balance_delta(id, delta)
    }

    fn transfer(
        &self,
        debit_id: AccountId,
        debit_amount: u64,
        credit_id: AccountId,
        credit_amount: u64,
    ) -> DomainResult<(u64, u64)> {
        (**self).transfer(debit_id, debit_amount, credit_id, credit_amount)
    }

    fn claim_first_login_bonus(&self, id: AccountId) -> DomainResult<Account> {
        (**self).claim_first_login_bonus(id)
    }

    fn set_status(&self, id: AccountId, status: AccountStatus) -> DomainResult<Account> {
        (**self).set_status(id, status)
    }

    fn list(&self) -> DomainResult<Vec<Account>> {
        (**self).list()
    }
}

impl<L> TransferLog for Arc<L>
where
    L: TransferLog + ?Sized,
{
    fn append(&self, record: TransferRecord) -> DomainResult<()> {
        (**self).append(record)
    }

    fn append_fee(&self, record: FeeRecord) -> DomainResult<()> {
        (**self).append_fee(record)
    }

    fn list_all(&self) -> DomainResult<Vec<TransferRecord>> {
        (**self).list_all()
    }

    fn list_for(&self, email: &str) -> DomainResult<Vec<TransferRecord>> {
        (**self).list_for(email)
    }

    fn list_fees(&self) -> DomainResult<Vec<FeeRecord>> {
        (**self).list_fees()
    }
}

impl<L> CashRequestLog for Arc<L>
where
    L: CashRequestLog + ?Sized,
{
    fn append(&self, request: CashRequest) -> DomainResult<CashRequest> {
        (**self).append(request)
    }

    fn find(&self, id: RequestId) -> DomainResult<CashRequest> {
        (**self).find(id)
    }

    fn list_for_agent(&self, agent_email: &str) -> DomainResult<Vec<CashRequest>> {
        (**self).list_for_agent(agent_email)
    }

    fn resolve(
        &self,
        id: RequestId,
        resolution: Resolution,
        acting_agent_email: &str,
    ) -> DomainResult<CashRequest> {
        (**self).resolve(id, resolution, acting_agent_email)
    }
}
