/// Authentication Routes
///
/// Login, access-token refresh and refresh-token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{extract_bearer, CredentialManager};
use crate::error::{AppError, ErrorContext, ValidationError};

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the user plus both credentials
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Refresh and revoke carry the refresh token as a bearer credential. A
/// missing or malformed header is a bad request there, not an auth failure.
fn refresh_token_from(req: &HttpRequest) -> Result<&str, AppError> {
    extract_bearer(req.headers()).map_err(|_| {
        AppError::Validation(ValidationError::InvalidFormat(
            "Authorization header".to_string(),
        ))
    })
}

/// POST /api/login
///
/// # Errors
/// - 401: Unknown email or wrong password (same body for both)
/// - 500: Hashing, entropy or storage failure
pub async fn login(
    form: web::Json<LoginRequest>,
    credentials: web::Data<CredentialManager>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let issued = credentials.login(form.email.trim(), &form.password).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %issued.user.id,
        "Login succeeded"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        id: issued.user.id,
        created_at: issued.user.created_at,
        updated_at: issued.user.updated_at,
        email: issued.user.email,
        is_chirpy_red: issued.user.is_chirpy_red,
        token: issued.access_token,
        refresh_token: issued.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Requires `Authorization: Bearer <refresh_token>`. The refresh token is
/// neither rotated nor extended.
///
/// # Errors
/// - 400: Missing or malformed Authorization header
/// - 401: Unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    credentials: web::Data<CredentialManager>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = refresh_token_from(&req)?;
    let token = credentials.refresh(refresh_token).await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Requires `Authorization: Bearer <refresh_token>`. Responds 204 with an
/// empty body; revoking twice is fine.
///
/// # Errors
/// - 400: Missing header or a token that was never issued
/// - 500: Storage failure
pub async fn revoke(
    req: HttpRequest,
    credentials: web::Data<CredentialManager>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = refresh_token_from(&req)?;
    credentials.revoke(refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}
