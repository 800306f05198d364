//! The ledger operation boundary.
//!
//! One method per inbound operation. Every session-gated method resolves the
//! bearer claims to a principal account, consults the access policy, then
//! executes against the injected stores. Business failures come back as
//! structured `DomainError`s, never panics; presentation is the caller's
//! concern.

use chrono::Utc;

use coinwave_auth::{
    Capability, CredentialVerifier, Principal, Role, SessionClaims, authorize, validate_claims,
};
use coinwave_core::{AccountId, DomainError, DomainResult, RequestId, TransactionId};
use coinwave_infra::{AccountStore, CashRequestLog, TransferLog};
use coinwave_ledger::{
    Account, AccountDraft, AccountStatus, CashRequest, FeeRecord, Resolution, TransferRecord,
    fee_for, transfer::validate_amount,
};

use crate::dto::{LoginRequest, SendMoneyRequest, SettlementOutcome, SignupRequest};

/// Ledger service wiring stores, credential capability, and access policy.
///
/// Stores are constructed dependencies injected at process start; the
/// service holds no global state of its own.
pub struct LedgerService<S, T, R, V> {
    accounts: S,
    transfers: T,
    cash_in: R,
    cash_out: R,
    credentials: V,
}

impl<S, T, R, V> LedgerService<S, T, R, V>
where
    S: AccountStore,
    T: TransferLog,
    R: CashRequestLog,
    V: CredentialVerifier,
{
    pub fn new(accounts: S, transfers: T, cash_in: R, cash_out: R, credentials: V) -> Self {
        Self {
            accounts,
            transfers,
            cash_in,
            cash_out,
            credentials,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Unauthenticated surface
    // ─────────────────────────────────────────────────────────────────────

    /// Create a new account with status `pending` and a zero balance.
    pub fn signup(&self, req: SignupRequest) -> DomainResult<Account> {
        if req.email.trim().is_empty() || req.mobile.trim().is_empty() {
            return Err(DomainError::validation("email and mobile are required"));
        }
        let draft = AccountDraft {
            name: req.name,
            email: req.email,
            mobile: req.mobile,
            role: req.role,
            credential_hash: self.credentials.hash(&req.secret),
        };
        let account = self.accounts.create(draft)?;
        tracing::info!(account_id = %account.id, role = %account.role, "account created");
        Ok(account)
    }

    /// Issue session claims for a credential-bearing payload.
    ///
    /// Credential check only; `login` is the status-gated variant.
    pub fn issue_session(&self, email: &str, secret: &str) -> DomainResult<SessionClaims> {
        let account = self.accounts.find_by_email(email)?;
        if !self.credentials.verify(secret, &account.credential_hash) {
            return Err(DomainError::InvalidCredential);
        }
        Ok(SessionClaims::issue(account.email, Utc::now()))
    }

    /// Full login: resolve by email (precedence) or mobile, gate on account
    /// status, verify the secret, then issue a 12-hour session.
    pub fn login(&self, req: LoginRequest) -> DomainResult<SessionClaims> {
        let account = match (&req.email, &req.mobile) {
            (Some(email), _) => self.accounts.find_by_email(email)?,
            (None, Some(mobile)) => self.accounts.find_by_mobile(mobile)?,
            (None, None) => {
                return Err(DomainError::validation("email or mobile is required"));
            }
        };

        account.ensure_sessionable()?;

        if !self.credentials.verify(&req.secret, &account.credential_hash) {
            return Err(DomainError::InvalidCredential);
        }

        tracing::info!(account_id = %account.id, "session issued");
        Ok(SessionClaims::issue(account.email, Utc::now()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session plumbing
    // ─────────────────────────────────────────────────────────────────────

    /// Resolve bearer claims to the principal's account.
    ///
    /// Any defect in the claims (expired, unknown subject) is reported as
    /// `Unauthorized`; session-gated callers never learn whether the account
    /// exists.
    fn principal_account(&self, session: &SessionClaims) -> DomainResult<Account> {
        validate_claims(session, Utc::now()).map_err(|_| DomainError::Unauthorized)?;
        self.accounts
            .find_by_email(&session.sub)
            .map_err(|_| DomainError::Unauthorized)
    }

    fn principal_of(account: &Account) -> Principal {
        Principal::new(account.email.clone(), account.role)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────

    /// Fetch the principal's own account record.
    pub fn get_own_profile(&self, session: &SessionClaims) -> DomainResult<Account> {
        let account = self.principal_account(session)?;
        authorize(
            &Self::principal_of(&account),
            &Capability::SelfOnly {
                email: account.email.clone(),
            },
        )?;
        Ok(account)
    }

    /// Admin: list every account.
    pub fn list_accounts(&self, session: &SessionClaims) -> DomainResult<Vec<Account>> {
        let actor = self.principal_account(session)?;
        authorize(&Self::principal_of(&actor), &Capability::Admin)?;
        self.accounts.list()
    }

    /// Accounts with role `agent`.
    pub fn list_agents(&self, session: &SessionClaims) -> DomainResult<Vec<Account>> {
        self.principal_account(session)?;
        Ok(self
            .accounts
            .list()?
            .into_iter()
            .filter(|a| a.role == Role::Agent)
            .collect())
    }

    /// Admin: change an account's status (the only mutable field besides
    /// balance and the first-login flag).
    pub fn set_account_status(
        &self,
        session: &SessionClaims,
        id: AccountId,
        status: AccountStatus,
    ) -> DomainResult<Account> {
        let actor = self.principal_account(session)?;
        authorize(&Self::principal_of(&actor), &Capability::Admin)?;
        let account = self.accounts.set_status(id, status)?;
        tracing::info!(account_id = %id, status = ?status, "account status changed");
        Ok(account)
    }

    /// Credit the one-time first-login bonus (40 for users, 10000 for
    /// agents). Idempotent: a second trigger returns the account unchanged.
    pub fn apply_first_login_bonus(
        &self,
        session: &SessionClaims,
        id: AccountId,
    ) -> DomainResult<Account> {
        self.principal_account(session)?;
        self.accounts.claim_first_login_bonus(id)
    }

    /// Resolve a transfer receiver by mobile number.
    ///
    /// Only plain-user accounts with a mobile different from the sender's
    /// are returned; the caller sees a same-number signal or `NotFound`
    /// instead of the record otherwise.
    pub fn lookup_receiver(
        &self,
        session: &SessionClaims,
        receiver_mobile: &str,
        sender_mobile: &str,
    ) -> DomainResult<Account> {
        self.principal_account(session)?;
        if receiver_mobile == sender_mobile {
            return Err(DomainError::validation(
                "sender and receiver mobile numbers are the same",
            ));
        }
        let receiver = self.accounts.find_by_mobile(receiver_mobile)?;
        if !receiver.is_valid_receiver(sender_mobile) {
            return Err(DomainError::NotFound);
        }
        Ok(receiver)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Peer transfers
    // ─────────────────────────────────────────────────────────────────────

    /// Peer transfer: debit the sender by `amount + fee` and credit the
    /// receiver by `amount` under one store-level settlement, then append
    /// the transfer record (and a fee record when a fee was assessed).
    ///
    /// Aborts as a whole on `InsufficientFunds`: no balance moves and no
    /// record is written.
    pub fn send_money(
        &self,
        session: &SessionClaims,
        req: SendMoneyRequest,
    ) -> DomainResult<TransferRecord> {
        let sender = self.principal_account(session)?;

        if !self.credentials.verify(&req.secret, &sender.credential_hash) {
            return Err(DomainError::InvalidCredential);
        }
        validate_amount(req.amount)?;

        let receiver = self.accounts.find_by_email(&req.receiver_email)?;
        if !receiver.is_valid_receiver(&sender.mobile) {
            return Err(DomainError::NotFound);
        }

        let fee = fee_for(req.amount);
        let debit = req
            .amount
            .checked_add(fee)
            .ok_or_else(|| DomainError::validation("amount out of range"))?;

        match self
            .accounts
            .transfer(sender.id, debit, receiver.id, req.amount)
        {
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(sender = %sender.id, amount = req.amount, %err, "transfer rejected");
                return Err(err);
            }
        }

        let transaction_id = TransactionId::new();
        let now = Utc::now();
        let record = TransferRecord {
            transaction_id,
            sender: sender.snapshot(),
            receiver: receiver.snapshot(),
            amount: req.amount,
            occurred_at: now,
        };
        self.transfers.append(record.clone())?;

        if fee > 0 {
            self.transfers.append_fee(FeeRecord {
                transaction_id,
                fee,
                payer: sender.snapshot(),
                occurred_at: now,
            })?;
        }

        tracing::info!(%transaction_id, amount = req.amount, fee, "transfer committed");
        Ok(record)
    }

    /// Standalone receiver credit for client-orchestrated flows; returns the
    /// new balance.
    pub fn credit_receiver(
        &self,
        session: &SessionClaims,
        receiver_email: &str,
        amount: u64,
    ) -> DomainResult<u64> {
        self.principal_account(session)?;
        validate_amount(amount)?;
        let receiver = self.accounts.find_by_email(receiver_email)?;
        self.accounts.apply_balance_delta(receiver.id, amount as i64)
    }

    /// Transfers where the principal is sender or receiver.
    pub fn list_own_transfers(
        &self,
        session: &SessionClaims,
        email: &str,
    ) -> DomainResult<Vec<TransferRecord>> {
        let account = self.principal_account(session)?;
        authorize(
            &Self::principal_of(&account),
            &Capability::SelfOnly {
                email: email.to_string(),
            },
        )?;
        self.transfers.list_for(email)
    }

    /// Admin: the whole transfer log.
    pub fn list_all_transfers(&self, session: &SessionClaims) -> DomainResult<Vec<TransferRecord>> {
        let actor = self.principal_account(session)?;
        authorize(&Self::principal_of(&actor), &Capability::Admin)?;
        self.transfers.list_all()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cash requests
    // ─────────────────────────────────────────────────────────────────────

    fn open_cash_request(
        &self,
        session: &SessionClaims,
        agent_email: &str,
        amount: u64,
    ) -> DomainResult<CashRequest> {
        let requester = self.principal_account(session)?;
        // Cash requests are opened by plain users; agents and admins move
        // money through their own surfaces.
        if requester.role != Role::User {
            return Err(DomainError::Forbidden);
        }
        let agent = self.accounts.find_by_email(agent_email)?;
        if agent.role != Role::Agent {
            return Err(DomainError::NotFound);
        }
        CashRequest::open(requester.snapshot(), agent.snapshot(), amount, Utc::now())
    }

    /// User opens a pending cash-in request towards an agent.
    pub fn create_cash_in_request(
        &self,
        session: &SessionClaims,
        agent_email: &str,
        amount: u64,
    ) -> DomainResult<CashRequest> {
        let request = self.open_cash_request(session, agent_email, amount)?;
        self.cash_in.append(request)
    }

    /// Agent lists cash-in requests addressed to them.
    pub fn list_cash_in_requests(
        &self,
        session: &SessionClaims,
        agent_email: &str,
    ) -> DomainResult<Vec<CashRequest>> {
        let actor = self.principal_account(session)?;
        let principal = Self::principal_of(&actor);
        authorize(&principal, &Capability::Agent)?;
        authorize(
            &principal,
            &Capability::SelfOnly {
                email: agent_email.to_string(),
            },
        )?;
        self.cash_in.list_for_agent(agent_email)
    }

    /// Agent resolves a pending cash-in request, exactly once. Acceptance
    /// triggers settlement: the requesting user is credited and the agent
    /// debited by the request amount, both legs under one store-level
    /// settlement.
    ///
    /// The status transition is the single-shot guard, so a settlement
    /// failure (agent out of funds) leaves the request accepted but
    /// unsettled; the error reports that to the caller rather than rolling
    /// back the already-terminal status.
    pub fn resolve_cash_in_request(
        &self,
        session: &SessionClaims,
        id: RequestId,
        resolution: Resolution,
    ) -> DomainResult<CashRequest> {
        let actor = self.principal_account(session)?;
        authorize(&Self::principal_of(&actor), &Capability::Agent)?;

        let request = self.cash_in.resolve(id, resolution, &actor.email)?;

        if resolution == Resolution::Accepted {
            let user = self.accounts.find_by_email(&request.requester.email)?;
            if let Err(err) =
                self.accounts
                    .transfer(actor.id, request.amount, user.id, request.amount)
            {
                tracing::warn!(request_id = %id, %err, "cash-in accepted but settlement failed");
                return Err(err);
            }
            tracing::info!(request_id = %id, amount = request.amount, "cash-in settled");
        }

        Ok(request)
    }

    /// Two-leg cash-in settlement: credit the user, debit the agent by the
    /// same amount. Exposed for client-orchestrated flows; both legs commit
    /// atomically or the whole call fails.
    pub fn settle_cash_in(
        &self,
        session: &SessionClaims,
        user_email: &str,
        agent_email: &str,
        amount: u64,
    ) -> DomainResult<SettlementOutcome> {
        self.principal_account(session)?;
        validate_amount(amount)?;
        if user_email == agent_email {
            return Err(DomainError::validation(
                "user and agent must be different accounts",
            ));
        }

        let user = self.accounts.find_by_email(user_email)?;
        let agent = self.accounts.find_by_email(agent_email)?;
        if agent.role != Role::Agent {
            return Err(DomainError::NotFound);
        }

        let (agent_balance, user_balance) =
            self.accounts.transfer(agent.id, amount, user.id, amount)?;

        Ok(SettlementOutcome {
            user_balance,
            agent_balance,
        })
    }

    /// User logs a cash-out request towards an agent. Creation only: the
    /// balance side is resolved by an external process.
    pub fn create_cash_out_request(
        &self,
        session: &SessionClaims,
        agent_email: &str,
        amount: u64,
    ) -> DomainResult<CashRequest> {
        let request = self.open_cash_request(session, agent_email, amount)?;
        self.cash_out.append(request)
    }

    /// Agent lists cash-out requests addressed to them.
    pub fn list_cash_out_requests(
        &self,
        session: &SessionClaims,
        agent_email: &str,
    ) -> DomainResult<Vec<CashRequest>> {
        let actor = self.principal_account(session)?;
        let principal = Self::principal_of(&actor);
        authorize(&principal, &Capability::Agent)?;
        authorize(
            &principal,
            &Capability::SelfOnly {
                email: agent_email.to_string(),
            },
        )?;
        self.cash_out.list_for_agent(agent_email)
    }
}
