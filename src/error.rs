/// Error Handling Module
///
/// One closed hierarchy for the whole service:
/// 1. Domain-specific error kinds (validation, database, auth, crypto, config)
/// 2. A unified `AppError` used for control flow
/// 3. The HTTP mapping, which is the only place where kinds become coarse messages
/// 4. Structured error logging with context

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(String),
    TooShort(String, usize),
    TooLong(String, usize),
    ChirpTooLong(usize),
    InvalidFormat(String),
    MalformedBody(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is required", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::ChirpTooLong(_) => write!(f, "Chirp is too long"),
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
            ValidationError::MalformedBody(msg) => write!(f, "Invalid request payload: {}", msg),
        }
    }
}

impl StdError for ValidationError {}

/// Database operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Authentication and authorization errors
///
/// The access-token kinds (`MalformedToken`, `BadSignature`, `Expired`, `WrongIssuer`)
/// exist for logging. At the HTTP boundary they all render as a plain 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    MissingCredential,
    Unauthorized,
    MalformedToken,
    BadSignature,
    Expired,
    WrongIssuer,
    InvalidRefreshToken,
    UnknownToken,
    InvalidApiKey,
    Forbidden,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Incorrect email or password"),
            AuthError::MissingCredential => {
                write!(f, "Missing or malformed authorization header")
            }
            AuthError::Unauthorized => write!(f, "Unauthorized"),
            AuthError::MalformedToken => write!(f, "Token could not be parsed"),
            AuthError::BadSignature => write!(f, "Token signature does not verify"),
            AuthError::Expired => write!(f, "Token has expired"),
            AuthError::WrongIssuer => write!(f, "Token issuer does not match"),
            AuthError::InvalidRefreshToken => {
                write!(f, "Refresh token is invalid, revoked or expired")
            }
            AuthError::UnknownToken => write!(f, "Refresh token not found"),
            AuthError::InvalidApiKey => write!(f, "Invalid API key"),
            AuthError::Forbidden => write!(f, "Caller does not own this resource"),
        }
    }
}

impl StdError for AuthError {}

/// Failures of the cryptographic primitives
#[derive(Debug)]
pub enum CryptoError {
    HashingFailure(String),
    EntropyUnavailable(String),
    TokenSigning(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::HashingFailure(msg) => write!(f, "Password hashing failed: {}", msg),
            CryptoError::EntropyUnavailable(msg) => {
                write!(f, "Entropy source unavailable: {}", msg)
            }
            CryptoError::TokenSigning(msg) => write!(f, "Token signing failed: {}", msg),
        }
    }
}

impl StdError for CryptoError {}

/// Configuration errors
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Database(DatabaseError),
    Auth(AuthError),
    Crypto(CryptoError),
    Config(ConfigError),
    Internal(String),
}

impl AppError {
    /// The auth kind carried by this error, if any.
    pub fn auth_kind(&self) -> Option<AuthError> {
        match self {
            AppError::Auth(e) => Some(*e),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Crypto(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        AppError::Crypto(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                AppError::Database(DatabaseError::NotFound("Record".to_string()))
            }
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::Database(DatabaseError::UniqueConstraintViolation(
                    "Email already registered".to_string(),
                ))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Database(DatabaseError::ConnectionPool(err.to_string()))
            }
            other => AppError::Database(DatabaseError::UnexpectedError(other.to_string())),
        }
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error body sent to clients
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Generic, non-leaking message
    pub error: String,
    /// Error code for client-side handling
    pub code: String,
    /// Id under which the detailed error was logged
    pub error_id: String,
}

impl AppError {
    /// Status, code and client-facing message.
    ///
    /// Internal details never reach the message: auth failures collapse to a
    /// handful of fixed strings and infrastructure failures to a single one.
    fn public_parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),

            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => {
                    (StatusCode::CONFLICT, "DUPLICATE_ENTRY", e.to_string())
                }
                DatabaseError::NotFound(what) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{} not found", what))
                }
                DatabaseError::ConnectionPool(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Database service temporarily unavailable".to_string(),
                ),
                DatabaseError::UnexpectedError(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Something went wrong".to_string(),
                ),
            },

            AppError::Auth(e) => match e {
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Incorrect email or password".to_string(),
                ),
                AuthError::MissingCredential
                | AuthError::Unauthorized
                | AuthError::MalformedToken
                | AuthError::BadSignature
                | AuthError::Expired
                | AuthError::WrongIssuer
                | AuthError::InvalidRefreshToken
                | AuthError::InvalidApiKey => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized".to_string())
                }
                AuthError::UnknownToken => {
                    (StatusCode::BAD_REQUEST, "UNKNOWN_TOKEN", "Invalid token".to_string())
                }
                AuthError::Forbidden => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", "Forbidden".to_string())
                }
            },

            AppError::Crypto(_) | AppError::Config(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Something went wrong".to_string(),
            ),
        }
    }

    fn log_error(&self, error_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(error_id = error_id, error = %e, "Validation error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_))
            | AppError::Database(DatabaseError::NotFound(_)) => {
                tracing::info!(error_id = error_id, error = %self, "Lookup failed");
            }
            AppError::Database(e) => {
                tracing::error!(error_id = error_id, error = %e, "Database error");
            }
            AppError::Auth(AuthError::InvalidCredentials) => {
                tracing::warn!(error_id = error_id, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(error_id = error_id, kind = ?e, "Authentication error");
            }
            AppError::Crypto(e) => {
                tracing::error!(error_id = error_id, error = %e, "Crypto failure");
            }
            AppError::Config(e) => {
                tracing::error!(error_id = error_id, error = %e, "Configuration error");
            }
            AppError::Internal(msg) => {
                tracing::error!(error_id = error_id, error = %msg, "Internal error");
            }
        }
    }
}

/// Actix-web integration
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&error_id);

        let (status, code, message) = self.public_parts();
        HttpResponse::build(status).json(ErrorResponse {
            error: message,
            code: code.to_string(),
            error_id,
        })
    }

    fn status_code(&self) -> StatusCode {
        self.public_parts().0
    }
}

// ============================================================================
// 4. ERROR CONTEXT
// ============================================================================

/// Per-operation context attached to success logs
///
/// Failures are logged once, by `ResponseError::error_response`.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub user_id: Option<String>,
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            operation: operation.into(),
        }
    }

    pub fn with_user_id(mut self, user_id: impl ToString) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }
}
