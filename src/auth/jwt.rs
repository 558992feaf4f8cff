/// Access Token Codec
///
/// Issues and validates HS256-signed access tokens. The signing secret is
/// consumed once, when the codec is built at startup; after that the codec is
/// immutable and shared by every worker.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::configuration::AuthSettings;
use crate::error::{AuthError, ConfigError, CryptoError};

#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl AccessTokenCodec {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, ConfigError> {
        let secret = settings.jwt_secret()?;
        Ok(Self::new(
            secret.as_bytes(),
            settings.issuer.clone(),
            settings.access_token_ttl()?,
        ))
    }

    /// Issue a token for `user_id` with the configured TTL
    pub fn issue(&self, user_id: Uuid) -> Result<String, CryptoError> {
        self.issue_at(user_id, Utc::now(), self.ttl)
    }

    /// Issue a token as if the clock read `now`
    ///
    /// # Errors
    /// `TokenSigning` if the token cannot be encoded
    pub fn issue_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, CryptoError> {
        let claims = Claims::new(user_id, now, ttl, &self.issuer);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CryptoError::TokenSigning(e.to_string()))
    }

    /// Validate a token and return its subject
    pub fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token against the clock reading `now`
    ///
    /// # Errors
    /// - `MalformedToken` if the token cannot be parsed
    /// - `BadSignature` if the MAC does not verify with this secret
    /// - `WrongIssuer` if the token was not issued by this service
    /// - `Expired` if `now` is at or past `exp`
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // Expiry is checked below against `now`, without leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                ErrorKind::InvalidIssuer => AuthError::WrongIssuer,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::MalformedToken,
            })?;

        if claims.is_expired_at(now) {
            return Err(AuthError::Expired);
        }

        claims.user_id()
    }
}
