//! Account, card and transaction-history store

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Account, AccountWithNumber, Card, Transaction};

/// Account/card store contract consumed by the transaction domain service
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Look up an account (joined with its owner's account number) by the
    /// public account number
    async fn get_account_by_number(
        &self,
        account_number: &str,
    ) -> DatabaseResult<Option<AccountWithNumber>>;

    /// Look up an account by id
    async fn get_account_by_id(&self, account_id: Uuid) -> DatabaseResult<Option<Account>>;

    /// Look up a card by id
    async fn get_card_by_id(&self, card_id: Uuid) -> DatabaseResult<Option<Card>>;

    /// Increment an account's overall balance, addressed by account number
    async fn deposit_to_account(&self, account_number: &str, amount: Decimal)
    -> DatabaseResult<()>;

    /// Set a card's balance to an absolute value
    async fn update_card_balance(&self, card_id: Uuid, new_balance: Decimal)
    -> DatabaseResult<()>;

    /// Set an account's overall balance to an absolute value
    async fn update_account_balance(
        &self,
        account_id: Uuid,
        new_balance: Decimal,
    ) -> DatabaseResult<()>;

    /// Decrement a card's balance
    async fn withdraw_from_card(&self, card_id: Uuid, amount: Decimal) -> DatabaseResult<()>;

    /// Cards belonging to an account
    async fn get_cards_for_account(&self, account_id: Uuid) -> DatabaseResult<Vec<Card>>;

    /// Most recent transaction records touching an account's cards
    async fn get_transactions_for_account(
        &self,
        account_id: Uuid,
    ) -> DatabaseResult<Vec<Transaction>>;
}

/// How many history rows the financial-info view returns
const TRANSACTION_HISTORY_LIMIT: i64 = 20;

/// sqlx-backed account/card store
#[derive(Clone)]
pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn card_from_row(row: &sqlx::postgres::PgRow) -> Card {
    Card {
        id: row.get("id"),
        account_id: row.get("account_id"),
        number: row.get("number"),
        brand: row.get("brand"),
        expiry: row.get("expiry"),
        cvv_hash: row.get("cvv_hash"),
        balance: row.get("balance"),
    }
}

#[async_trait]
impl TransactionStore for PgTransactionRepository {
    async fn get_account_by_number(
        &self,
        account_number: &str,
    ) -> DatabaseResult<Option<AccountWithNumber>> {
        let row = sqlx::query(
            r#"
            SELECT a.id, u.account_number, a.overall_balance,
                   a.withdrawal_daily_limit, a.transfer_daily_limit, a.default_card
            FROM accounts a
            JOIN users u ON u.id = a.user_id
            WHERE u.account_number = $1
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| AccountWithNumber {
            id: row.get("id"),
            account_number: row.get("account_number"),
            overall_balance: row.get("overall_balance"),
            withdrawal_daily_limit: row.get("withdrawal_daily_limit"),
            transfer_daily_limit: row.get("transfer_daily_limit"),
            default_card: row.get("default_card"),
        }))
    }

    async fn get_account_by_id(&self, account_id: Uuid) -> DatabaseResult<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, overall_balance, withdrawal_daily_limit,
                   transfer_daily_limit, default_card
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Account {
            id: row.get("id"),
            user_id: row.get("user_id"),
            overall_balance: row.get("overall_balance"),
            withdrawal_daily_limit: row.get("withdrawal_daily_limit"),
            transfer_daily_limit: row.get("transfer_daily_limit"),
            default_card: row.get("default_card"),
        }))
    }

    async fn get_card_by_id(&self, card_id: Uuid) -> DatabaseResult<Option<Card>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_id, number, brand, expiry, cvv_hash, balance
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| card_from_row(&row)))
    }

    async fn deposit_to_account(
        &self,
        account_number: &str,
        amount: Decimal,
    ) -> DatabaseResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET overall_balance = overall_balance + $2
            FROM users
            WHERE accounts.user_id = users.id AND users.account_number = $1
            "#,
        )
        .bind(account_number)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::Query(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    async fn update_card_balance(
        &self,
        card_id: Uuid,
        new_balance: Decimal,
    ) -> DatabaseResult<()> {
        sqlx::query("UPDATE cards SET balance = $2 WHERE id = $1")
            .bind(card_id)
            .bind(new_balance)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_account_balance(
        &self,
        account_id: Uuid,
        new_balance: Decimal,
    ) -> DatabaseResult<()> {
        sqlx::query("UPDATE accounts SET overall_balance = $2 WHERE id = $1")
            .bind(account_id)
            .bind(new_balance)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn withdraw_from_card(&self, card_id: Uuid, amount: Decimal) -> DatabaseResult<()> {
        // The balance predicate makes the decrement refuse to land when a
        // concurrent write drained the card after the domain-level check.
        let result = sqlx::query(
            r#"
            UPDATE cards
            SET balance = balance - $2
            WHERE id = $1 AND balance >= $2
            "#,
        )
        .bind(card_id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::Query(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    async fn get_cards_for_account(&self, account_id: Uuid) -> DatabaseResult<Vec<Card>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, number, brand, expiry, cvv_hash, balance
            FROM cards
            WHERE account_id = $1
            ORDER BY number
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(card_from_row).collect())
    }

    async fn get_transactions_for_account(
        &self,
        account_id: Uuid,
    ) -> DatabaseResult<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.sender_card_id, t.receiver_card_id, t.amount,
                   t.transaction_type, t.status, t.created_at
            FROM transactions t
            WHERE t.sender_card_id IN (SELECT id FROM cards WHERE account_id = $1)
               OR t.receiver_card_id IN (SELECT id FROM cards WHERE account_id = $1)
            ORDER BY t.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(account_id)
        .bind(TRANSACTION_HISTORY_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Transaction {
                id: row.get("id"),
                sender_card_id: row.get("sender_card_id"),
                receiver_card_id: row.get("receiver_card_id"),
                amount: row.get("amount"),
                transaction_type: row.get("transaction_type"),
                status: row.get("status"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
