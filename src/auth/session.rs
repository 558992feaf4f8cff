/// Credential Lifecycle
///
/// Login, refresh and revoke. A refresh-token row moves from `Active` to
/// either `Revoked` or `Expired` and never back. Refresh does not rotate or
/// extend the refresh token; it stays usable until it expires or is revoked.

use std::sync::Arc;

use chrono::{Duration, Utc};
use lazy_static::lazy_static;

use crate::auth::jwt::AccessTokenCodec;
use crate::auth::password::{hash_password, verify_password, PasswordCheck};
use crate::auth::refresh_token::generate_refresh_token;
use crate::error::{AppError, AuthError};
use crate::models::{RefreshTokenState, User};
use crate::store::Store;

lazy_static! {
    // Verified against when the email is unknown, so both failure paths pay
    // the same bcrypt cost.
    static ref DUMMY_HASH: Option<String> = hash_password("chirpy-timing-equalizer").ok();
}

/// Tokens handed out by a successful login
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct CredentialManager {
    store: Arc<dyn Store>,
    codec: AccessTokenCodec,
    refresh_ttl: Duration,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn Store>, codec: AccessTokenCodec, refresh_ttl: Duration) -> Self {
        Self {
            store,
            codec,
            refresh_ttl,
        }
    }

    pub fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }

    /// Verify a password and issue an access token plus a new refresh token
    ///
    /// Persists one refresh-token row per call. Unknown email and wrong
    /// password both fail with `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedCredentials, AppError> {
        let user = match self.store.find_user_by_email(email).await? {
            Some(user) => user,
            None => {
                if let Some(dummy) = DUMMY_HASH.as_deref() {
                    let _ = verify_password(password, dummy);
                }
                tracing::debug!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if verify_password(password, &user.hashed_password)? == PasswordCheck::Mismatch {
            tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = self.codec.issue(user.id)?;
        let refresh_token = generate_refresh_token()?;
        let expires_at = Utc::now()
            .checked_add_signed(self.refresh_ttl)
            .ok_or_else(|| AppError::Internal("refresh token expiry overflows".to_string()))?;
        self.store
            .insert_refresh_token(&refresh_token, user.id, expires_at)
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(IssuedCredentials {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Mint a new access token from an active refresh token
    ///
    /// # Errors
    /// `InvalidRefreshToken` if the token is unknown, revoked or expired
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let record = self
            .store
            .find_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Refresh token not found");
                AuthError::InvalidRefreshToken
            })?;

        match record.state_at(Utc::now()) {
            RefreshTokenState::Active => {}
            state => {
                tracing::warn!(user_id = %record.user_id, state = ?state, "Refresh token unusable");
                return Err(AuthError::InvalidRefreshToken.into());
            }
        }

        let access_token = self.codec.issue(record.user_id)?;
        tracing::info!(user_id = %record.user_id, "Access token refreshed");
        Ok(access_token)
    }

    /// Revoke a refresh token
    ///
    /// Revoking an already revoked token succeeds and changes nothing.
    ///
    /// # Errors
    /// `UnknownToken` if no such token was ever issued
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        if !self
            .store
            .revoke_refresh_token(refresh_token, Utc::now())
            .await?
        {
            return Err(AuthError::UnknownToken.into());
        }

        tracing::info!("Refresh token revoked");
        Ok(())
    }
}
