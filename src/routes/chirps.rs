use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::assert_owner;
use crate::error::{AppError, DatabaseError, ErrorContext, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::moderation::clean_chirp;
use crate::store::Store;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

fn parse_id(raw: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(ValidationError::InvalidFormat(field.to_string())))
}

fn chirp_not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("Chirp".to_string()))
}

/// POST /api/chirps
///
/// The author is always the token subject.
pub async fn create_chirp(
    caller: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let cleaned = clean_chirp(&form.body)?;
    let chirp = store.create_chirp(caller.user_id, &cleaned).await?;

    tracing::info!(chirp_id = %chirp.id, user_id = %caller.user_id, "Chirp created");
    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps?author_id=<uuid>&sort=asc|desc
///
/// Sorted by creation time, ascending unless `sort=desc`.
pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let author = query
        .author_id
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_id(raw, "author_id"))
        .transpose()?;

    let mut chirps = store.list_chirps(author).await?;
    if query.sort.as_deref() == Some("desc") {
        chirps.reverse();
    }

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_id(&path, "chirp_id")?;
    let chirp = store.get_chirp(chirp_id).await?.ok_or_else(chirp_not_found)?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 403: Caller is not the author; nothing is deleted
/// - 404: No such chirp
pub async fn delete_chirp(
    caller: AuthenticatedUser,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_delete").with_user_id(caller.user_id);
    let chirp_id = parse_id(&path, "chirp_id")?;

    let chirp = store.get_chirp(chirp_id).await?.ok_or_else(chirp_not_found)?;
    assert_owner(chirp.user_id, caller.user_id)?;

    store.delete_chirp(chirp_id).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = ?context.user_id,
        chirp_id = %chirp_id,
        "Chirp deleted"
    );
    Ok(HttpResponse::NoContent().finish())
}
