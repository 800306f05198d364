//! `coinwave-ledger` — mobile-money ledger domain.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod request;
pub mod transfer;

pub use account::{Account, AccountDraft, AccountStatus, PartySnapshot};
pub use request::{CashRequest, RequestStatus, Resolution};
pub use transfer::{FEE_THRESHOLD, FeeRecord, TRANSFER_FEE, TransferRecord, fee_for};
