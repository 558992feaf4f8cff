/// Access-token extractor
///
/// Handlers that need a caller identity take an `AuthenticatedUser` argument.
/// Extraction reads `Authorization: Bearer <access_token>`, validates it with
/// the shared `AccessTokenCodec`, and rejects the request with 401 otherwise.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::{authenticate, AccessTokenCodec};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        let codec = req
            .app_data::<web::Data<AccessTokenCodec>>()
            .ok_or_else(|| AppError::Internal("access token codec not registered".to_string()))?;

        let user_id = authenticate(req.headers(), codec.get_ref())?;

        tracing::debug!(user_id = %user_id, "Access token validated");
        Ok(Self { user_id })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Duration;

    use crate::error::AuthError;

    fn codec() -> AccessTokenCodec {
        AccessTokenCodec::new(b"extractor-secret", "chirpy", Duration::hours(1))
    }

    #[actix_web::test]
    async fn test_extracts_subject() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let token = codec.issue(user_id).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(codec))
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.user_id, user_id);
    }

    #[actix_web::test]
    async fn test_rejects_missing_header() {
        let req = TestRequest::default()
            .app_data(web::Data::new(codec()))
            .to_http_request();

        let err = AuthenticatedUser::extract(&req).await.unwrap_err();
        assert_eq!(err.auth_kind(), Some(AuthError::Unauthorized));
    }
}
