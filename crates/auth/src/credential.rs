/// Credential hashing/verification capability.
///
/// The ledger core never inspects secrets; it only asks this collaborator to
/// hash a submitted secret at signup and to check a submitted secret against
/// a stored hash. Verification is a synchronous call with an explicit
/// boolean outcome (no callback/exception semantics). Production
/// implementations live outside this crate.
pub trait CredentialVerifier: Send + Sync {
    /// Hash a submitted secret for storage.
    fn hash(&self, secret: &str) -> String;

    /// Check a submitted secret against a stored hash.
    fn verify(&self, secret: &str, stored_hash: &str) -> bool;
}

impl<V> CredentialVerifier for std::sync::Arc<V>
where
    V: CredentialVerifier + ?Sized,
{
    fn hash(&self, secret: &str) -> String {
        (**self).hash(secret)
    }

    fn verify(&self, secret: &str, stored_hash: &str) -> bool {
        (**self).verify(secret, stored_hash)
    }
}
