//! Password value object - hashing and verification.
//!
//! Plaintext never leaves this module: callers get back an Argon2id PHC
//! string and the entity only ever stores that.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::{ARGON2_ITERATIONS, ARGON2_MEMORY_KIB, ARGON2_PARALLELISM};
use crate::errors::{AppError, AppResult};

/// Message returned when hashing fails; the cause is logged, never returned.
pub const PASSWORD_PROCESSING_FAILED: &str = "cannot process password";

/// Hashed password.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Length rules are enforced at the request boundary, not here.
    ///
    /// # Errors
    /// Returns an `Internal` error with a generic message if hashing fails.
    pub fn hash(plain_text: &str) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AppError::internal(PASSWORD_PROCESSING_FAILED)
            })?;

        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }

    /// Argon2id with the fixed work factor.
    fn argon2() -> AppResult<Argon2<'static>> {
        let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, None)
            .map_err(|e| {
                tracing::error!(error = %e, "invalid argon2 parameters");
                AppError::internal(PASSWORD_PROCESSING_FAILED)
            })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}
