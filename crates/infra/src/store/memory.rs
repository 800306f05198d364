//! In-memory document store for tests/dev.
//!
//! The same trait surface can be backed by any key-value/document store with
//! find/insert/update primitives; here the critical sections map to a
//! process-local `RwLock` write guard.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use coinwave_core::{AccountId, DomainError, DomainResult, RequestId};
use coinwave_ledger::{
    Account, AccountDraft, AccountStatus, CashRequest, FeeRecord, Resolution, TransferRecord,
};

use super::{AccountStore, CashRequestLog, TransferLog};

fn poisoned(what: &str) -> DomainError {
    DomainError::store(format!("{what} lock poisoned"))
}

/// Apply a signed delta to an unsigned balance with a zero floor.
fn checked_apply(balance: u64, delta: i64) -> DomainResult<u64> {
    if delta >= 0 {
        balance
            .checked_add(delta as u64)
            .ok_or_else(|| DomainError::store("balance overflow"))
    } else {
        balance
            .checked_sub(delta.unsigned_abs())
            .ok_or(DomainError::InsufficientFunds)
    }
}

/// In-memory account collection.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn find_by_id(&self, id: AccountId) -> DomainResult<Account> {
        let map = self.inner.read().map_err(|_| poisoned("account store"))?;
        map.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    fn find_by_email(&self, email: &str) -> DomainResult<Account> {
        let map = self.inner.read().map_err(|_| poisoned("account store"))?;
        map.values()
            .find(|a| a.email == email)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn find_by_mobile(&self, mobile: &str) -> DomainResult<Account> {
        let map = self.inner.read().map_err(|_| poisoned("account store"))?;
        map.values()
            .find(|a| a.mobile == mobile)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn create(&self, draft: AccountDraft) -> DomainResult<Account> {
        let mut map = self.inner.write().map_err(|_| poisoned("account store"))?;
        if map
            .values()
            .any(|a| a.email == draft.email || a.mobile == draft.mobile)
        {
            return Err(DomainError::DuplicateAccount);
        }
        let account = Account::from_draft(AccountId::new(), draft, Utc::now());
        map.insert(account.id, account.clone());
        Ok(account)
    }

    fn apply_balance_delta(&self, id: AccountId, delta: i64) -> DomainResult<u64> {
        let mut map = self.inner.write().map_err(|_| poisoned("account store"))?;
        let account = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        // Checked before written: a rejected delta leaves no state change.
        let new_balance = checked_apply(account.balance, delta)?;
        account.balance = new_balance;
        Ok(new_balance)
    }

    fn transfer(
        &self,
        debit_id: AccountId,
        debit_amount: u64,
        credit_id: AccountId,
        credit_amount: u64,
    ) -> DomainResult<(u64, u64)> {
        if debit_id == credit_id {
            return Err(DomainError::validation(
                "debit and credit accounts must be different",
            ));
        }

        let mut map = self.inner.write().map_err(|_| poisoned("account store"))?;

        let debit_balance = map.get(&debit_id).ok_or(DomainError::NotFound)?.balance;
        let credit_balance = map.get(&credit_id).ok_or(DomainError::NotFound)?.balance;

        // Validate both legs before touching either balance.
        let debited = debit_balance
            .checked_sub(debit_amount)
            .ok_or(DomainError::InsufficientFunds)?;
        let credited = credit_balance
            .checked_add(credit_amount)
            .ok_or_else(|| DomainError::store("balance overflow"))?;

        if let Some(a) = map.get_mut(&debit_id) {
            a.balance = debited;
        }
        if let Some(a) = map.get_mut(&credit_id) {
            a.balance = credited;
        }
        Ok((debited, credited))
    }

    fn claim_first_login_bonus(&self, id: AccountId) -> DomainResult<Account> {
        let mut map = self.inner.write().map_err(|_| poisoned("account store"))?;
        let account = map.get_mut(&id).ok_or(DomainError::NotFound)?;

        // Flag check, credit and flag clear under one write guard: a
        // concurrent duplicate trigger observes the cleared flag.
        if account.first_login {
            let bonus = account.role.first_login_bonus();
            account.balance = account
                .balance
                .checked_add(bonus)
                .ok_or_else(|| DomainError::store("balance overflow"))?;
            account.first_login = false;
        }
        Ok(account.clone())
    }

    fn set_status(&self, id: AccountId, status: AccountStatus) -> DomainResult<Account> {
        let mut map = self.inner.write().map_err(|_| poisoned("account store"))?;
        let account = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        account.status = status;
        Ok(account.clone())
    }

    fn list(&self) -> DomainResult<Vec<Account>> {
        let map = self.inner.read().map_err(|_| poisoned("account store"))?;
        let mut accounts: Vec<Account> = map.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }
}

/// In-memory append-only transfer/fee history.
#[derive(Debug, Default)]
pub struct InMemoryTransferLog {
    transfers: RwLock<Vec<TransferRecord>>,
    fees: RwLock<Vec<FeeRecord>>,
}

impl InMemoryTransferLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransferLog for InMemoryTransferLog {
    fn append(&self, record: TransferRecord) -> DomainResult<()> {
        let mut log = self.transfers.write().map_err(|_| poisoned("transfer log"))?;
        log.push(record);
        Ok(())
    }

    fn append_fee(&self, record: FeeRecord) -> DomainResult<()> {
        let mut log = self.fees.write().map_err(|_| poisoned("fee log"))?;
        log.push(record);
        Ok(())
    }

    fn list_all(&self) -> DomainResult<Vec<TransferRecord>> {
        let log = self.transfers.read().map_err(|_| poisoned("transfer log"))?;
        Ok(log.clone())
    }

    fn list_for(&self, email: &str) -> DomainResult<Vec<TransferRecord>> {
        let log = self.transfers.read().map_err(|_| poisoned("transfer log"))?;
        Ok(log
            .iter()
            .filter(|t| t.sender.email == email || t.receiver.email == email)
            .cloned()
            .collect())
    }

    fn list_fees(&self) -> DomainResult<Vec<FeeRecord>> {
        let log = self.fees.read().map_err(|_| poisoned("fee log"))?;
        Ok(log.clone())
    }
}

/// In-memory cash request collection (instantiate once per direction).
#[derive(Debug, Default)]
pub struct InMemoryCashRequestLog {
    inner: RwLock<Vec<CashRequest>>,
}

impl InMemoryCashRequestLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CashRequestLog for InMemoryCashRequestLog {
    fn append(&self, request: CashRequest) -> DomainResult<CashRequest> {
        let mut log = self.inner.write().map_err(|_| poisoned("request log"))?;
        log.push(request.clone());
        Ok(request)
    }

    fn find(&self, id: RequestId) -> DomainResult<CashRequest> {
        let log = self.inner.read().map_err(|_| poisoned("request log"))?;
        log.iter().find(|r| r.id == id).cloned().ok_or(DomainError::NotFound)
    }

    fn list_for_agent(&self, agent_email: &str) -> DomainResult<Vec<CashRequest>> {
        let log = self.inner.read().map_err(|_| poisoned("request log"))?;
        Ok(log
            .iter()
            .filter(|r| r.agent.email == agent_email)
            .cloned()
            .collect())
    }

    fn resolve(
        &self,
        id: RequestId,
        resolution: Resolution,
        acting_agent_email: &str,
    ) -> DomainResult<CashRequest> {
        let mut log = self.inner.write().map_err(|_| poisoned("request log"))?;
        let request = log
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::NotFound)?;
        request.resolve(resolution, acting_agent_email)?;
        Ok(request.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use coinwave_auth::Role;
    use coinwave_core::TransactionId;
    use coinwave_ledger::PartySnapshot;
    use proptest::prelude::*;

    use super::*;

    fn draft(email: &str, mobile: &str, role: Role) -> AccountDraft {
        AccountDraft {
            name: email.to_string(),
            email: email.to_string(),
            mobile: mobile.to_string(),
            role,
            credential_hash: "h".to_string(),
        }
    }

    fn seeded(balance: u64) -> (InMemoryAccountStore, AccountId) {
        let store = InMemoryAccountStore::new();
        let acc = store.create(draft("a@x.com", "0171", Role::User)).unwrap();
        if balance > 0 {
            store.apply_balance_delta(acc.id, balance as i64).unwrap();
        }
        (store, acc.id)
    }

    #[test]
    fn create_rejects_duplicate_email_and_mobile() {
        let store = InMemoryAccountStore::new();
        store.create(draft("a@x.com", "0171", Role::User)).unwrap();

        let err = store.create(draft("a@x.com", "0172", Role::User)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateAccount);

        let err = store.create(draft("b@x.com", "0171", Role::User)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateAccount);
    }

    #[test]
    fn delta_below_floor_is_rejected_without_state_change() {
        let (store, id) = seeded(50);

        let err = store.apply_balance_delta(id, -60).unwrap_err();
        assert_eq!(err, DomainError::InsufficientFunds);
        assert_eq!(store.find_by_id(id).unwrap().balance, 50);
    }

    #[test]
    fn concurrent_debits_cannot_both_pass_the_floor() {
        let (store, id) = seeded(100);
        let store = Arc::new(store);

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.apply_balance_delta(id, -80))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(successes, 1);
        assert_eq!(store.find_by_id(id).unwrap().balance, 20);
    }

    #[test]
    fn first_login_bonus_is_credited_exactly_once() {
        let store = InMemoryAccountStore::new();
        let acc = store.create(draft("u@x.com", "0171", Role::User)).unwrap();

        let after_first = store.claim_first_login_bonus(acc.id).unwrap();
        assert_eq!(after_first.balance, 40);
        assert!(!after_first.first_login);

        let after_second = store.claim_first_login_bonus(acc.id).unwrap();
        assert_eq!(after_second.balance, 40);
    }

    #[test]
    fn agent_bonus_is_ten_thousand() {
        let store = InMemoryAccountStore::new();
        let acc = store.create(draft("ag@x.com", "0171", Role::Agent)).unwrap();

        let after = store.claim_first_login_bonus(acc.id).unwrap();
        assert_eq!(after.balance, 10_000);
    }

    #[test]
    fn concurrent_bonus_triggers_credit_once() {
        let store = InMemoryAccountStore::new();
        let acc = store.create(draft("u@x.com", "0171", Role::User)).unwrap();
        let store = Arc::new(store);
        let id = acc.id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.claim_first_login_bonus(id))
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }

        assert_eq!(store.find_by_id(id).unwrap().balance, 40);
    }

    #[test]
    fn transfer_settles_both_legs_or_neither() {
        let store = InMemoryAccountStore::new();
        let a = store.create(draft("a@x.com", "0171", Role::User)).unwrap();
        let b = store.create(draft("b@x.com", "0172", Role::User)).unwrap();
        store.apply_balance_delta(a.id, 1000).unwrap();

        let (debited, credited) = store.transfer(a.id, 155, b.id, 150).unwrap();
        assert_eq!(debited, 845);
        assert_eq!(credited, 150);

        // Failing debit leg leaves the credit leg untouched.
        let err = store.transfer(a.id, 10_000, b.id, 10_000).unwrap_err();
        assert_eq!(err, DomainError::InsufficientFunds);
        assert_eq!(store.find_by_id(a.id).unwrap().balance, 845);
        assert_eq!(store.find_by_id(b.id).unwrap().balance, 150);
    }

    #[test]
    fn transfer_rejects_aliased_accounts() {
        let (store, id) = seeded(100);

        // Overlapping writes on one account would net +credit_amount and
        // mint money; the aliased pair must be refused outright.
        let err = store.transfer(id, 50, id, 50).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.find_by_id(id).unwrap().balance, 100);
    }

    #[test]
    fn resolved_requests_reject_a_second_resolution() {
        let log = InMemoryCashRequestLog::new();
        let party = |email: &str| PartySnapshot {
            name: email.to_string(),
            email: email.to_string(),
            mobile: "0170".to_string(),
        };
        let req = CashRequest::open(party("u@x.com"), party("ag@x.com"), 500, Utc::now()).unwrap();
        let req = log.append(req).unwrap();

        let resolved = log.resolve(req.id, Resolution::Accepted, "ag@x.com").unwrap();
        assert_eq!(resolved.status, coinwave_ledger::RequestStatus::Accepted);

        let err = log.resolve(req.id, Resolution::Rejected, "ag@x.com").unwrap_err();
        assert_eq!(err, DomainError::InvalidTransition);
    }

    #[test]
    fn transfer_log_filters_by_party_email() {
        let log = InMemoryTransferLog::new();
        let party = |email: &str| PartySnapshot {
            name: email.to_string(),
            email: email.to_string(),
            mobile: "0170".to_string(),
        };
        log.append(TransferRecord {
            transaction_id: TransactionId::new(),
            sender: party("a@x.com"),
            receiver: party("b@x.com"),
            amount: 10,
            occurred_at: Utc::now(),
        })
        .unwrap();

        assert_eq!(log.list_for("a@x.com").unwrap().len(), 1);
        assert_eq!(log.list_for("b@x.com").unwrap().len(), 1);
        assert_eq!(log.list_for("c@x.com").unwrap().len(), 0);
    }

    proptest! {
        // The balance floor holds for any sequence of deltas: every accepted
        // delta lands exactly, every rejected one changes nothing.
        #[test]
        fn balance_never_goes_negative(deltas in proptest::collection::vec(-500i64..500, 1..64)) {
            let (store, id) = seeded(0);
            let mut expected: u64 = 0;

            for delta in deltas {
                match store.apply_balance_delta(id, delta) {
                    Ok(new_balance) => {
                        expected = expected.checked_add_signed(delta).unwrap();
                        prop_assert_eq!(new_balance, expected);
                    }
                    Err(err) => {
                        prop_assert_eq!(err, DomainError::InsufficientFunds);
                        prop_assert!(delta < 0 && expected < delta.unsigned_abs());
                    }
                }
                prop_assert_eq!(store.find_by_id(id).unwrap().balance, expected);
            }
        }
    }
}
