use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::hash_token;
use crate::error::{AppError, DatabaseError};
use crate::models::{Chirp, RefreshTokenRecord, User};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    chirps: HashMap<Uuid, Chirp>,
    /// Keyed by token digest, like the Postgres table.
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
}

/// In-process store with the same semantics as `PgStore`
///
/// Every operation takes the lock once, so each call is atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

fn user_not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("User".to_string()))
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.email == email) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Email already registered".to_string(),
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Email already registered".to_string(),
            )));
        }

        let user = tables.users.get_mut(&id).ok_or_else(user_not_found)?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        let user = tables.users.get_mut(&id).ok_or_else(user_not_found)?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AppError> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&user_id) {
            return Err(user_not_found());
        }

        let key = hash_token(token);
        if tables.refresh_tokens.contains_key(&key) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Refresh token already exists".to_string(),
            )));
        }

        let record = RefreshTokenRecord {
            token: token.to_string(),
            user_id,
            created_at: Utc::now(),
            expires_at,
            revoked_at: None,
        };
        tables.refresh_tokens.insert(key, record.clone());
        Ok(record)
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        let tables = self.lock()?;
        Ok(tables.refresh_tokens.get(&hash_token(token)).cloned())
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        match tables.refresh_tokens.get_mut(&hash_token(token)) {
            Some(record) => {
                record.revoked_at.get_or_insert(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&user_id) {
            return Err(user_not_found());
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, AppError> {
        let tables = self.lock()?;
        let mut chirps: Vec<Chirp> = tables
            .chirps
            .values()
            .filter(|c| author.map_or(true, |a| c.user_id == a))
            .cloned()
            .collect();
        chirps.sort_by_key(|c| c.created_at);
        Ok(chirps)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError> {
        let tables = self.lock()?;
        Ok(tables.chirps.get(&id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        tables
            .chirps
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::Database(DatabaseError::NotFound("Chirp".to_string())))
    }

    async fn reset(&self) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        *tables = Tables::default();
        tracing::info!("All users deleted");
        Ok(())
    }
}
