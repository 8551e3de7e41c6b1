use secrecy::SecretString;

/// Verifies submitted passwords against stored hashes.
///
/// The hashing scheme is up to the implementation; realms only ever ask
/// whether a plaintext matches what they have on record.
pub trait PasswordService: Send + Sync {
    /// Hash a plaintext password into the stored representation.
    fn hash_password(&self, plaintext: &SecretString) -> String;

    /// Whether `plaintext` hashes to `stored`.
    fn passwords_match(&self, plaintext: &SecretString, stored: &str) -> bool;
}
