//! `coinwave-service` — the inbound operation boundary.
//!
//! HTTP wiring, token encoding, and password hashing live outside this
//! workspace; callers hand each operation an already-validated
//! credential-bearing payload or bearer claims.

pub mod dto;
pub mod service;

pub use dto::{LoginRequest, SendMoneyRequest, SettlementOutcome, SignupRequest};
pub use service::LedgerService;
