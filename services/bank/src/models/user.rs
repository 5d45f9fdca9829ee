//! User model and its public projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
///
/// `account_number` is the public login identifier; `pin_hash` is the
/// argon2 digest of the PIN. `failed_attempts` and `blocked_until` drive
/// the login lockout state machine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub account_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub pin_hash: String,
    pub failed_attempts: i32,
    pub blocked_until: Option<DateTime<Utc>>,
}

/// Projection of a user that is safe to hand back to callers
///
/// Never carries the PIN hash or the email address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub account_number: String,
    pub first_name: String,
    pub last_name: String,
    pub blocked_until: Option<DateTime<Utc>>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            account_number: user.account_number.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            blocked_until: user.blocked_until,
        }
    }
}
