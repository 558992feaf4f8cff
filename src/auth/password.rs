/// Password Hashing and Verification
///
/// Salted one-way hashing with bcrypt. Verification goes through bcrypt's own
/// comparison so callers never compare hashes themselves.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::CryptoError;

/// Outcome of checking a password against a stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Match,
    Mismatch,
}

/// Hash a password using bcrypt
///
/// # Errors
/// Returns `HashingFailure` if bcrypt itself fails
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    hash(password, DEFAULT_COST).map_err(|e| CryptoError::HashingFailure(e.to_string()))
}

/// Verify a password against its hash
///
/// A wrong password is `Ok(PasswordCheck::Mismatch)`, not an error. Callers
/// must report it exactly like an unknown account.
///
/// # Errors
/// Returns `HashingFailure` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<PasswordCheck, CryptoError> {
    let matched = verify(password, hash).map_err(|e| CryptoError::HashingFailure(e.to_string()))?;
    Ok(if matched {
        PasswordCheck::Match
    } else {
        PasswordCheck::Mismatch
    })
}
