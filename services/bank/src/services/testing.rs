//! In-memory collaborator fakes shared by the service and handler tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::hashing::PinHasher;
use crate::jwt::{Claims, TokenIssuer};
use crate::models::{
    Account, AccountWithNumber, Card, CardBrand, Transaction, TransactionStatus, TransactionType,
    User,
};
use crate::repositories::{TransactionStore, UserStore};

pub const FAKE_TOKEN: &str = "valid.jwt.token";

/// Transparent PIN hasher: digests are `hashed:<pin>`
pub struct FakePinHasher;

impl PinHasher for FakePinHasher {
    fn hash(&self, pin: &str) -> Result<String> {
        Ok(format!("hashed:{pin}"))
    }

    fn compare(&self, pin: &str, digest: &str) -> Result<bool> {
        Ok(digest == format!("hashed:{pin}"))
    }
}

/// Token issuer that hands out a single canned token
pub struct FakeTokenIssuer;

impl TokenIssuer for FakeTokenIssuer {
    fn generate_token(&self, _user_id: Uuid) -> Result<String> {
        Ok(FAKE_TOKEN.to_string())
    }

    fn verify_token(&self, token: &str) -> Result<Claims> {
        if token == FAKE_TOKEN {
            Ok(Claims {
                sub: Uuid::nil(),
                iat: 0,
                exp: u64::MAX,
            })
        } else {
            Err(anyhow::anyhow!("invalid token"))
        }
    }
}

/// A user with the default PIN `0000`
pub fn test_user(account_number: &str) -> User {
    User {
        id: Uuid::new_v4(),
        account_number: account_number.to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@email.com".to_string(),
        pin_hash: "hashed:0000".to_string(),
        failed_attempts: 0,
        blocked_until: None,
    }
}

/// In-memory user store
pub struct MockUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MockUserStore {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    /// Current state of a stored user
    pub fn user(&self, id: Uuid) -> User {
        self.users.lock().unwrap().get(&id).expect("unknown user").clone()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn get_user_by_account_number(
        &self,
        account_number: &str,
    ) -> DatabaseResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.account_number == account_number)
            .cloned())
    }

    async fn set_failed_attempts(&self, user_id: Uuid, attempts: i32) -> DatabaseResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.failed_attempts = attempts;
        }
        Ok(())
    }

    async fn set_blocked_until(
        &self,
        user_id: Uuid,
        blocked_until: Option<DateTime<Utc>>,
    ) -> DatabaseResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.blocked_until = blocked_until;
        }
        Ok(())
    }

    async fn update_user_pin(&self, user_id: Uuid, new_pin_hash: &str) -> DatabaseResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.pin_hash = new_pin_hash.to_string();
        }
        Ok(())
    }
}

/// A Visa card with the given balance
pub fn test_card(balance: Decimal) -> Card {
    Card {
        id: Uuid::new_v4(),
        account_id: Uuid::new_v4(),
        number: "4111111111111111".to_string(),
        brand: CardBrand::Visa,
        expiry: Utc::now() + chrono::Duration::days(365),
        cvv_hash: "hashed:123".to_string(),
        balance,
    }
}

/// An account with 5000 daily limits and the given balance and default card
pub fn test_account(overall_balance: Decimal, default_card: Uuid) -> Account {
    Account {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        overall_balance,
        withdrawal_daily_limit: Decimal::from(5000),
        transfer_daily_limit: Decimal::from(5000),
        default_card,
    }
}

/// In-memory account/card store
///
/// `serve_stale_card_reads` freezes card lookups at the current state while
/// writes keep landing, to reproduce the check-then-write race. Writes stay
/// deliberately non-atomic, like the behavior under test.
pub struct MockTransactionStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
    account_numbers: Mutex<HashMap<String, Uuid>>,
    cards: Mutex<HashMap<Uuid, Card>>,
    card_snapshots: Mutex<HashMap<Uuid, Card>>,
    transactions: Mutex<Vec<Transaction>>,
    stale_card_reads: AtomicBool,
    account_by_id_fails: AtomicBool,
}

impl MockTransactionStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            account_numbers: Mutex::new(HashMap::new()),
            cards: Mutex::new(HashMap::new()),
            card_snapshots: Mutex::new(HashMap::new()),
            transactions: Mutex::new(Vec::new()),
            stale_card_reads: AtomicBool::new(false),
            account_by_id_fails: AtomicBool::new(false),
        }
    }

    pub fn add_card(&self, card: Card) -> Card {
        self.cards.lock().unwrap().insert(card.id, card.clone());
        card
    }

    pub fn add_account(&self, account_number: &str, account: Account) -> Account {
        self.account_numbers
            .lock()
            .unwrap()
            .insert(account_number.to_string(), account.id);
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        account
    }

    pub fn add_transaction(&self, receiver_card_id: Uuid, amount: Decimal) {
        self.transactions.lock().unwrap().push(Transaction {
            id: Uuid::new_v4(),
            sender_card_id: None,
            receiver_card_id: Some(receiver_card_id),
            amount,
            transaction_type: TransactionType::Deposit,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        });
    }

    /// Current state of a stored account
    pub fn account(&self, id: Uuid) -> Account {
        self.accounts.lock().unwrap().get(&id).expect("unknown account").clone()
    }

    /// Current state of a stored card
    pub fn card(&self, id: Uuid) -> Card {
        self.cards.lock().unwrap().get(&id).expect("unknown card").clone()
    }

    /// Freeze card lookups at the current state
    pub fn serve_stale_card_reads(&self) {
        *self.card_snapshots.lock().unwrap() = self.cards.lock().unwrap().clone();
        self.stale_card_reads.store(true, Ordering::SeqCst);
    }

    /// Make `get_account_by_id` fail from now on
    pub fn fail_account_by_id(&self) {
        self.account_by_id_fails.store(true, Ordering::SeqCst);
    }

    /// Attach a card to an account for the ownership-based queries
    pub fn link_card(&self, card_id: Uuid, account_id: Uuid) {
        if let Some(card) = self.cards.lock().unwrap().get_mut(&card_id) {
            card.account_id = account_id;
        }
    }
}

#[async_trait]
impl TransactionStore for MockTransactionStore {
    async fn get_account_by_number(
        &self,
        account_number: &str,
    ) -> DatabaseResult<Option<AccountWithNumber>> {
        let id = match self.account_numbers.lock().unwrap().get(account_number) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.accounts.lock().unwrap().get(&id).map(|a| AccountWithNumber {
            id: a.id,
            account_number: account_number.to_string(),
            overall_balance: a.overall_balance,
            withdrawal_daily_limit: a.withdrawal_daily_limit,
            transfer_daily_limit: a.transfer_daily_limit,
            default_card: a.default_card,
        }))
    }

    async fn get_account_by_id(&self, account_id: Uuid) -> DatabaseResult<Option<Account>> {
        if self.account_by_id_fails.load(Ordering::SeqCst) {
            return Err(DatabaseError::Configuration("injected failure".to_string()));
        }
        Ok(self.accounts.lock().unwrap().get(&account_id).cloned())
    }

    async fn get_card_by_id(&self, card_id: Uuid) -> DatabaseResult<Option<Card>> {
        if self.stale_card_reads.load(Ordering::SeqCst) {
            return Ok(self.card_snapshots.lock().unwrap().get(&card_id).cloned());
        }
        Ok(self.cards.lock().unwrap().get(&card_id).cloned())
    }

    async fn deposit_to_account(
        &self,
        account_number: &str,
        amount: Decimal,
    ) -> DatabaseResult<()> {
        let id = self
            .account_numbers
            .lock()
            .unwrap()
            .get(account_number)
            .copied()
            .ok_or_else(|| DatabaseError::Configuration("unknown account".to_string()))?;
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&id) {
            account.overall_balance += amount;
        }
        Ok(())
    }

    async fn update_card_balance(
        &self,
        card_id: Uuid,
        new_balance: Decimal,
    ) -> DatabaseResult<()> {
        if let Some(card) = self.cards.lock().unwrap().get_mut(&card_id) {
            card.balance = new_balance;
        }
        Ok(())
    }

    async fn update_account_balance(
        &self,
        account_id: Uuid,
        new_balance: Decimal,
    ) -> DatabaseResult<()> {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&account_id) {
            account.overall_balance = new_balance;
        }
        Ok(())
    }

    async fn withdraw_from_card(&self, card_id: Uuid, amount: Decimal) -> DatabaseResult<()> {
        if let Some(card) = self.cards.lock().unwrap().get_mut(&card_id) {
            card.balance -= amount;
        }
        Ok(())
    }

    async fn get_cards_for_account(&self, account_id: Uuid) -> DatabaseResult<Vec<Card>> {
        Ok(self
            .cards
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn get_transactions_for_account(
        &self,
        account_id: Uuid,
    ) -> DatabaseResult<Vec<Transaction>> {
        let card_ids: Vec<Uuid> = self
            .cards
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.account_id == account_id)
            .map(|c| c.id)
            .collect();
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                t.sender_card_id.is_some_and(|id| card_ids.contains(&id))
                    || t.receiver_card_id.is_some_and(|id| card_ids.contains(&id))
            })
            .cloned()
            .collect())
    }
}
