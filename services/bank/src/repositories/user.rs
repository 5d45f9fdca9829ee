//! User store for login and PIN lifecycle state

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::User;

/// User store contract consumed by the auth domain service
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by the public account number
    async fn get_user_by_account_number(&self, account_number: &str)
    -> DatabaseResult<Option<User>>;

    /// Persist the failed-login counter
    async fn set_failed_attempts(&self, user_id: Uuid, attempts: i32) -> DatabaseResult<()>;

    /// Persist the block window; `None` unblocks the user
    async fn set_blocked_until(
        &self,
        user_id: Uuid,
        blocked_until: Option<DateTime<Utc>>,
    ) -> DatabaseResult<()>;

    /// Replace the stored PIN digest
    async fn update_user_pin(&self, user_id: Uuid, new_pin_hash: &str) -> DatabaseResult<()>;
}

/// sqlx-backed user store
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn get_user_by_account_number(
        &self,
        account_number: &str,
    ) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_number, first_name, last_name, email,
                   pin_hash, failed_attempts, blocked_until
            FROM users
            WHERE account_number = $1
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            account_number: row.get("account_number"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            pin_hash: row.get("pin_hash"),
            failed_attempts: row.get("failed_attempts"),
            blocked_until: row.get("blocked_until"),
        }))
    }

    async fn set_failed_attempts(&self, user_id: Uuid, attempts: i32) -> DatabaseResult<()> {
        info!("Setting failed attempts for user {} to {}", user_id, attempts);

        sqlx::query("UPDATE users SET failed_attempts = $2 WHERE id = $1")
            .bind(user_id)
            .bind(attempts)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_blocked_until(
        &self,
        user_id: Uuid,
        blocked_until: Option<DateTime<Utc>>,
    ) -> DatabaseResult<()> {
        info!("Setting block window for user {} to {:?}", user_id, blocked_until);

        sqlx::query("UPDATE users SET blocked_until = $2 WHERE id = $1")
            .bind(user_id)
            .bind(blocked_until)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_user_pin(&self, user_id: Uuid, new_pin_hash: &str) -> DatabaseResult<()> {
        info!("Updating PIN for user {}", user_id);

        sqlx::query("UPDATE users SET pin_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(new_pin_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
