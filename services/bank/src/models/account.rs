//! Account model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account entity
///
/// Each user owns exactly one account. `overall_balance` tracks the sum of
/// the account's card balances; the daily limits are static per-account
/// caps compared against single requested amounts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub overall_balance: Decimal,
    pub withdrawal_daily_limit: Decimal,
    pub transfer_daily_limit: Decimal,
    /// Card credited by deposits and incoming external transfers
    pub default_card: Uuid,
}

/// Account joined with its owner's account number
///
/// Used where the caller identifies the account by the public account
/// number instead of the account id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountWithNumber {
    pub id: Uuid,
    pub account_number: String,
    pub overall_balance: Decimal,
    pub withdrawal_daily_limit: Decimal,
    pub transfer_daily_limit: Decimal,
    pub default_card: Uuid,
}
