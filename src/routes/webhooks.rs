use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::ApiKey;
use crate::error::{AppError, ValidationError};
use crate::store::Store;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Deserialize, Default)]
pub struct WebhookData {
    #[serde(default)]
    pub user_id: String,
}

/// POST /api/polka/webhooks
///
/// Authenticated with `Authorization: ApiKey <key>`. The key is checked
/// before the body is even parsed.
///
/// # Errors
/// - 401: Missing or wrong API key
/// - 400: Unparseable body or user id
/// - 404: Unknown user
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    api_key: web::Data<ApiKey>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    api_key.verify(req.headers())?;

    let event: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(ValidationError::MalformedBody(e.to_string())))?;

    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(&event.data.user_id).map_err(|_| {
        AppError::Validation(ValidationError::InvalidFormat("user_id".to_string()))
    })?;

    store.upgrade_to_chirpy_red(user_id).await?;

    tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");
    Ok(HttpResponse::NoContent().finish())
}
