//! `coinwave-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod credential;
pub mod policy;
pub mod roles;
pub mod session;

pub use credential::CredentialVerifier;
pub use policy::{Capability, Principal, authorize};
pub use roles::Role;
pub use session::{SESSION_TTL_HOURS, SessionClaims, SessionValidationError, validate_claims};
