//! Auth domain service: login lockout and PIN lifecycle

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{BankError, BankResult};
use crate::hashing::PinHasher;
use crate::jwt::TokenIssuer;
use crate::models::PublicUser;
use crate::repositories::UserStore;

/// Failed logins tolerated before the account is blocked
pub const MAX_FAILED_ATTEMPTS: i32 = 3;

/// How long a block lasts once the threshold is reached
pub const BLOCK_WINDOW_MINUTES: i64 = 5;

/// Token lifetime advertised to login callers, in seconds. The token's own
/// signed expiry is longer and owned by the token service.
pub const TOKEN_TTL_SECS: u64 = 300;

/// Successful login result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user: PublicUser,
    pub token: String,
    pub time_to_live: u64,
}

/// Auth domain service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PinHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PinHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Log a user in by account number and PIN
    ///
    /// Drives the lockout state machine: a stale block is lifted before the
    /// PIN check (without resetting the failure counter), a PIN mismatch
    /// increments the counter, and the attempt that reaches
    /// [`MAX_FAILED_ATTEMPTS`] blocks the user for [`BLOCK_WINDOW_MINUTES`].
    pub async fn login(&self, identifier: &str, pin: &str) -> BankResult<LoginOutcome> {
        let user = self
            .users
            .get_user_by_account_number(identifier)
            .await?
            .ok_or(BankError::Unauthorized)?;

        if let Some(blocked_until) = user.blocked_until {
            if blocked_until > Utc::now() {
                return Err(BankError::UserBlocked);
            }
            // Block expired: lift it before checking the PIN. The failure
            // counter carries over.
            self.users.set_blocked_until(user.id, None).await?;
        }

        let pin_valid = self.hasher.compare(pin, &user.pin_hash)?;
        if !pin_valid {
            let updated_failed_attempts = user.failed_attempts + 1;

            if updated_failed_attempts >= MAX_FAILED_ATTEMPTS {
                let block_until = Utc::now() + Duration::minutes(BLOCK_WINDOW_MINUTES);
                self.users
                    .set_blocked_until(user.id, Some(block_until))
                    .await?;
                warn!("User {} blocked until {}", user.id, block_until);
                return Err(BankError::TooManyFailedAttempts);
            }

            self.users
                .set_failed_attempts(user.id, updated_failed_attempts)
                .await?;
            return Err(BankError::Unauthorized);
        }

        self.users.set_failed_attempts(user.id, 0).await?;

        let token = self.tokens.generate_token(user.id)?;
        info!("User {} logged in", user.id);

        Ok(LoginOutcome {
            user: PublicUser::from(&user),
            token,
            time_to_live: TOKEN_TTL_SECS,
        })
    }

    /// Replace a user's PIN after verifying the old one
    ///
    /// The same-PIN check runs before any lookup. Does not touch the
    /// failure counter or the block window.
    pub async fn change_pin(
        &self,
        identifier: &str,
        old_pin: &str,
        new_pin: &str,
    ) -> BankResult<()> {
        if old_pin == new_pin {
            return Err(BankError::SameNewOldPin);
        }

        let user = self
            .users
            .get_user_by_account_number(identifier)
            .await?
            .ok_or(BankError::Unauthorized)?;

        let old_pin_valid = self.hasher.compare(old_pin, &user.pin_hash)?;
        if !old_pin_valid {
            return Err(BankError::Unauthorized);
        }

        let new_pin_hash = self.hasher.hash(new_pin)?;
        self.users.update_user_pin(user.id, &new_pin_hash).await?;
        info!("User {} changed PIN", user.id);
        Ok(())
    }
}
