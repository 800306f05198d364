//! Dev/test credential capability.

use sha2::{Digest, Sha256};

use coinwave_auth::CredentialVerifier;

/// SHA-256 backed [`CredentialVerifier`] for tests and local development.
///
/// Not a password KDF; production deployments plug in their own verifier
/// behind the same trait.
#[derive(Debug, Default)]
pub struct Sha256Credentials;

impl Sha256Credentials {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialVerifier for Sha256Credentials {
    fn hash(&self, secret: &str) -> String {
        let digest = Sha256::digest(secret.as_bytes());
        format!("{digest:x}")
    }

    fn verify(&self, secret: &str, stored_hash: &str) -> bool {
        self.hash(secret) == stored_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_matches_only_the_hashed_secret() {
        let creds = Sha256Credentials::new();
        let hash = creds.hash("s3cret");

        assert!(creds.verify("s3cret", &hash));
        assert!(!creds.verify("other", &hash));
    }
}
