/// Request Authentication
///
/// Pulls credentials out of the `Authorization` header. Two schemes exist:
/// `Bearer <token>` for user credentials and `ApiKey <key>` for machine calls.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use uuid::Uuid;

use crate::auth::jwt::AccessTokenCodec;
use crate::configuration::AuthSettings;
use crate::error::{AuthError, ConfigError};

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Read `Authorization: Bearer <token>`
///
/// The scheme is matched case-sensitively.
///
/// # Errors
/// `MissingCredential` if the header is absent, not ASCII, uses another scheme,
/// or carries an empty token
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_scheme(headers, BEARER_PREFIX)
}

/// Read `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_scheme(headers, API_KEY_PREFIX)
}

fn extract_scheme<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingCredential)?;

    let credential = value
        .strip_prefix(prefix)
        .map(str::trim)
        .ok_or(AuthError::MissingCredential)?;

    if credential.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(credential)
}

/// Resolve the caller identity from an access token in the headers
///
/// Whatever goes wrong, the caller sees `Unauthorized`; the precise reason is
/// only logged.
pub fn authenticate(headers: &HeaderMap, codec: &AccessTokenCodec) -> Result<Uuid, AuthError> {
    let token = extract_bearer(headers).map_err(|e| {
        tracing::warn!(kind = ?e, "Missing or invalid Authorization header");
        AuthError::Unauthorized
    })?;

    codec.validate(token).map_err(|e| {
        tracing::warn!(kind = ?e, "Access token rejected");
        AuthError::Unauthorized
    })
}

/// Process-wide key for machine-to-machine webhook calls
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(settings.polka_key()?))
    }

    /// Check the `ApiKey` credential in `headers` by exact match
    pub fn verify(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let presented = extract_api_key(headers)?;
        if presented == self.0 {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}
