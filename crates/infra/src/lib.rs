//! `coinwave-infra` — storage abstractions and in-memory implementations.
//!
//! The store is a constructed dependency with explicit lifecycle: opened at
//! process start, injected into the service layer, never a module-level
//! singleton.

pub mod credentials;
pub mod store;

pub use credentials::Sha256Credentials;
pub use store::{
    AccountStore, CashRequestLog, TransferLog,
    memory::{InMemoryAccountStore, InMemoryCashRequestLog, InMemoryTransferLog},
};
