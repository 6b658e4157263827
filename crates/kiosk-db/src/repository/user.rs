//! # User Repository
//!
//! Login accounts. Password hashing happens in kiosk-api; this layer only
//! stores and returns the PHC string.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kiosk_core::User;

/// Role given to accounts created without an explicit one.
pub const DEFAULT_ROLE: &str = "owner";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Looks up a user by login identifier.
    pub async fn find_by_phone(&self, phone: &str) -> DbResult<Option<User>> {
        debug!(phone = %phone, "Looking up user");

        let user = sqlx::query_as::<_, User>(
            "SELECT id, phone, password_hash, role FROM users WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Creates the user unless the phone is already taken.
    ///
    /// ## Returns
    /// `true` if a row was inserted.
    pub async fn create_if_absent(&self, phone: &str, password_hash: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (phone, password_hash, role) VALUES (?1, ?2, ?3)",
        )
        .bind(phone)
        .bind(password_hash)
        .bind(DEFAULT_ROLE)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Counts registered users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
