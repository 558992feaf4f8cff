/// JWT Claims structure
///
/// Payload of an access token: the subject plus the standard RFC 7519 claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Token id, unique per issuance
    pub jti: String,
}

impl Claims {
    /// Create claims for `user_id`, valid for `ttl` from `now`
    pub fn new(user_id: Uuid, now: DateTime<Utc>, ttl: Duration, issuer: &str) -> Self {
        let iat = now.timestamp();
        Self {
            sub: user_id.to_string(),
            exp: iat.saturating_add(ttl.num_seconds()),
            iat,
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// `MalformedToken` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::MalformedToken)
    }

    /// Expired once `now` reaches `exp`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
