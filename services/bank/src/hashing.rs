//! PIN hashing collaborator
//!
//! One-way hash and compare for PIN secrets. The domain services only see
//! the [`PinHasher`] trait so tests can substitute a transparent fake.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Hash service contract consumed by the auth domain service
pub trait PinHasher: Send + Sync {
    /// Produce an opaque digest of the secret
    fn hash(&self, pin: &str) -> Result<String>;

    /// Check a plaintext secret against a stored digest
    fn compare(&self, pin: &str, digest: &str) -> Result<bool>;
}

/// Argon2-backed PIN hasher
#[derive(Clone, Default)]
pub struct ArgonPinHasher;

impl PinHasher for ArgonPinHasher {
    fn hash(&self, pin: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let digest = argon2
            .hash_password(pin.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash PIN: {}", e))?
            .to_string();
        Ok(digest)
    }

    fn compare(&self, pin: &str, digest: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(digest)
            .map_err(|e| anyhow::anyhow!("Failed to parse PIN hash: {}", e))?;

        let argon2 = Argon2::default();
        Ok(argon2.verify_password(pin.as_bytes(), &parsed_hash).is_ok())
    }
}
