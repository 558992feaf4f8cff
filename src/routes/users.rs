use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::error::{AppError, ErrorContext};
use crate::middleware::AuthenticatedUser;
use crate::models::User;
use crate::store::Store;
use crate::validators::{is_valid_email, is_valid_password};

#[derive(Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
}

/// A user as clients see it: never includes the password hash
#[derive(Serialize, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or empty password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<UserRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let user = store.create_user(&email, &hashed_password).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user.id,
        "User registered"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Updates the email and password of the authenticated user only.
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 400: Invalid email or empty password
pub async fn update_user(
    caller: AuthenticatedUser,
    form: web::Json<UserRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update");

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let user = store
        .update_user(caller.user_id, &email, &hashed_password)
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user.id,
        "User updated"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
