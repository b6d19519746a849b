//! One-way password hashing.
//!
//! Hashes are Argon2id PHC strings produced with the library's default cost
//! parameters and a fresh random salt per hash.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use tracing::warn;

/// Shortest plaintext accepted by [`PasswordHash::generate`].
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Errors raised while deriving a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// Plaintext is shorter than [`MIN_PASSWORD_LENGTH`] characters.
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
    /// The hashing primitive itself failed.
    #[error("failed to hash password: {message}")]
    Hashing { message: String },
}

/// Opaque salted password hash.
///
/// The value never implements `Serialize` and its `Debug` output is redacted.
///
/// # Examples
/// ```
/// use food_api::domain::PasswordHash;
///
/// let hash = PasswordHash::generate("s3cret").expect("long enough");
/// assert!(hash.verify("s3cret"));
/// assert!(!hash.verify("s3cret "));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `plaintext` with a fresh salt.
    pub fn generate(plaintext: &str) -> Result<Self, PasswordError> {
        if plaintext.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(phc.to_string()))
    }

    /// Wrap a PHC string previously produced by [`PasswordHash::generate`].
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC string suitable for storage.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }

    /// Check `plaintext` against the stored hash.
    ///
    /// A stored value that does not parse as a PHC string never verifies.
    pub fn verify(&self, plaintext: &str) -> bool {
        let parsed = match PhcString::new(&self.0) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, "stored password hash is not a valid PHC string");
                return false;
            }
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
