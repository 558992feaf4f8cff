/// Persistence
///
/// The credential core and the handlers only talk to `Store`. Two backends:
/// `PgStore` for Postgres and `MemoryStore` for tests and local runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Chirp, RefreshTokenRecord, User};

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with a unique-constraint error when the email is taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Overwrite email and password hash. Fails with `NotFound` for unknown ids.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, AppError>;

    /// Fails with `NotFound` for unknown ids.
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<User, AppError>;

    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AppError>;

    async fn find_refresh_token(&self, token: &str)
        -> Result<Option<RefreshTokenRecord>, AppError>;

    /// Mark the token revoked at `at`. Returns `false` when no such token exists.
    /// An already revoked token keeps its original timestamp.
    async fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>)
        -> Result<bool, AppError>;

    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError>;

    /// All chirps, optionally only those by `author`, oldest first.
    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, AppError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError>;

    async fn delete_chirp(&self, id: Uuid) -> Result<(), AppError>;

    /// Delete every user along with their chirps and refresh tokens.
    async fn reset(&self) -> Result<(), AppError>;
}
