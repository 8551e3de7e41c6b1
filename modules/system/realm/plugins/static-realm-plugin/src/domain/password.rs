//! Salted SHA-256 password service.

use realm_sdk::PasswordService;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Hashes passwords as lower-case hex of `SHA-256(private_salt || password)`.
#[derive(Debug, Clone)]
pub struct SaltedSha256PasswordService {
    private_salt: SecretString,
}

impl SaltedSha256PasswordService {
    #[must_use]
    pub fn new(private_salt: SecretString) -> Self {
        Self { private_salt }
    }
}

impl PasswordService for SaltedSha256PasswordService {
    fn hash_password(&self, plaintext: &SecretString) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.private_salt.expose_secret().as_bytes());
        hasher.update(plaintext.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn passwords_match(&self, plaintext: &SecretString, stored: &str) -> bool {
        let computed = self.hash_password(plaintext);
        constant_time_eq(computed.as_bytes(), stored.to_ascii_lowercase().as_bytes())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
