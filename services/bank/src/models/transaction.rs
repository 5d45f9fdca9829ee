//! Transaction record model
//!
//! Transaction rows are append-only history; the domain services read them
//! for the financial-info view and never mutate them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of a recorded transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

/// Lifecycle status of a recorded transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// Transaction record
///
/// `sender_card_id` is null for deposits; `receiver_card_id` is null for
/// withdrawals.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub sender_card_id: Option<Uuid>,
    pub receiver_card_id: Option<Uuid>,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}
