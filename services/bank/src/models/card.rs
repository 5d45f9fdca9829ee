//! Card model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Card brand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "card_brand")]
pub enum CardBrand {
    Visa,
    MasterCard,
    Maestro,
}

/// Card entity
///
/// A sub-ledger under an account. `balance` is the card's share of the
/// account's overall balance.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub account_id: Uuid,
    pub number: String,
    pub brand: CardBrand,
    pub expiry: DateTime<Utc>,
    pub cvv_hash: String,
    pub balance: Decimal,
}

impl Card {
    /// Card number reduced to its last four digits, for read-only views
    pub fn masked_number(&self) -> String {
        let digits = self.number.len();
        if digits <= 4 {
            return self.number.clone();
        }
        format!("****{}", &self.number[digits - 4..])
    }
}
