/// Refresh Token Generation
///
/// Refresh tokens are opaque: 32 bytes from the operating system's CSPRNG,
/// rendered as 64 lowercase hex characters. Nothing is embedded in them; their
/// meaning lives entirely in the stored row.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new refresh token
///
/// # Errors
/// `EntropyUnavailable` if the OS entropy source fails. There is no fallback
/// to a weaker generator.
pub fn generate_refresh_token() -> Result<String, CryptoError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 digest of a refresh token, hex encoded
///
/// Stores keep only this digest so a leaked table holds no usable tokens.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token().expect("Failed to generate token");

        assert_eq!(token.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_no_collisions() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let token = generate_refresh_token().expect("Failed to generate token");
            assert!(seen.insert(token), "duplicate refresh token generated");
        }
    }

    #[test]
    fn test_token_hashing() {
        let token = generate_refresh_token().unwrap();
        let hash1 = hash_token(&token);
        let hash2 = hash_token(&token);

        assert_eq!(hash1, hash2);
        assert_ne!(token, hash1);
        assert_eq!(hash1.len(), 64);
    }
}
