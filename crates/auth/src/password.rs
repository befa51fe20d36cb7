//! Argon2id password credentials.

use std::{fmt, str::FromStr};

use argon2::{Algorithm, Argon2};
use password_hash::{PasswordHashString, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngCore;

use crate::{AuthError, AuthResult, MIN_PASSWORD_LENGTH};

const SALT_LEN: usize = 16;

/// An Argon2id password hash in PHC string form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    phc: PasswordHashString,
}

impl PasswordHash {
    /// Hashes a password with a fresh random salt.
    pub fn new(password: &str) -> AuthResult<Self> {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);
        Self::with_salt(password, &salt)
    }

    /// Hashes a password with the given salt bytes.
    pub fn with_salt(password: &str, salt: &[u8]) -> AuthResult<Self> {
        let salt = SaltString::encode_b64(salt).map_err(hashing_error)?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(hashing_error)?;
        Ok(Self {
            phc: hash.serialize(),
        })
    }

    /// Returns true if the password matches this hash.
    pub fn verify(&self, password: &str) -> bool {
        Argon2::default()
            .verify_password(password.as_bytes(), &self.phc.password_hash())
            .is_ok()
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phc.as_str())
    }
}

// Never print the hash.
impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

impl FromStr for PasswordHash {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        let phc = PasswordHashString::new(s).map_err(|_| AuthError::MalformedCredential)?;
        if Algorithm::try_from(phc.algorithm()).is_err() {
            return Err(AuthError::MalformedCredential);
        }
        Ok(Self { phc })
    }
}

/// Checks a new password against its confirmation and the length rule.
pub fn validate_new_password(password: &str, confirm: &str) -> AuthResult<()> {
    if password != confirm {
        return Err(AuthError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

fn hashing_error(e: password_hash::Error) -> AuthError {
    AuthError::Hashing(e.to_string())
}
