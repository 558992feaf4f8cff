use actix_web::{web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::{AppError, AuthError};
use crate::middleware::HitCounter;
use crate::store::Store;

/// GET /admin/metrics
pub async fn metrics(counter: web::Data<HitCounter>) -> HttpResponse {
    let body = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        counter.hits()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// Only on the `dev` platform: deletes every user (with their chirps and
/// refresh tokens) and zeroes the hit counter.
pub async fn reset(
    application: web::Data<ApplicationSettings>,
    store: web::Data<dyn Store>,
    counter: web::Data<HitCounter>,
) -> Result<HttpResponse, AppError> {
    if !application.is_dev() {
        tracing::warn!(platform = %application.platform, "Reset refused outside dev");
        return Err(AuthError::Forbidden.into());
    }

    store.reset().await?;
    counter.reset();

    tracing::info!("Database reset");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Database reset successful" })))
}
