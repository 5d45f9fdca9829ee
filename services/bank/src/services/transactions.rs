//! Transaction domain service: balance mutation and limit enforcement

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{BankError, BankResult};
use crate::models::{Card, CardBrand, Transaction};
use crate::repositories::TransactionStore;

/// Withdrawal result
///
/// `remaining_withdrawal_limit` is the per-call remainder against the
/// static daily cap, not a running daily total.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalOutcome {
    pub overall_balance: Decimal,
    pub card_balance: Decimal,
    pub remaining_withdrawal_limit: Decimal,
}

/// Internal (same-account) transfer result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalTransferOutcome {
    pub sender_card_balance: Decimal,
    pub recipient_card_balance: Decimal,
    pub overall_balance: Decimal,
}

/// Sender half of an external transfer result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderOutcome {
    pub overall_balance: Decimal,
    pub card_balance: Decimal,
    pub remaining_transfer_limit: Decimal,
}

/// Receiver half of an external transfer result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverOutcome {
    pub overall_balance: Decimal,
    pub card_balance: Decimal,
}

/// External (cross-account) transfer result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTransferOutcome {
    pub sender: SenderOutcome,
    pub receiver: ReceiverOutcome,
}

/// Read-only card view inside the financial snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: Uuid,
    pub number: String,
    pub brand: CardBrand,
    pub balance: Decimal,
}

impl From<&Card> for CardSummary {
    fn from(card: &Card) -> Self {
        CardSummary {
            id: card.id,
            number: card.masked_number(),
            brand: card.brand,
            balance: card.balance,
        }
    }
}

/// Read-only financial snapshot of an account
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialInfo {
    pub account_number: String,
    pub overall_balance: Decimal,
    pub withdrawal_daily_limit: Decimal,
    pub transfer_daily_limit: Decimal,
    pub default_card: Uuid,
    pub cards: Vec<CardSummary>,
    pub recent_transactions: Vec<Transaction>,
}

/// Transaction domain service
#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Credit an account and its default card
    pub async fn deposit(&self, account_number: &str, amount: Decimal) -> BankResult<()> {
        if amount <= Decimal::ZERO {
            return Err(BankError::DepositAmountNotPositive);
        }

        let account = self
            .store
            .get_account_by_number(account_number)
            .await?
            .ok_or(BankError::InvalidAccount)?;

        self.store.deposit_to_account(account_number, amount).await?;

        let card = self
            .store
            .get_card_by_id(account.default_card)
            .await?
            .ok_or(BankError::CardNotFound)?;
        self.store
            .update_card_balance(card.id, card.balance + amount)
            .await?;

        info!("Deposited {} to account {}", amount, account.id);
        Ok(())
    }

    /// Debit a card and its account, enforcing funds and the daily cap
    pub async fn withdraw(
        &self,
        account_id: Uuid,
        card_id: Uuid,
        amount: Decimal,
    ) -> BankResult<WithdrawalOutcome> {
        if amount <= Decimal::ZERO {
            return Err(BankError::AmountNotPositive);
        }

        let card = self
            .store
            .get_card_by_id(card_id)
            .await?
            .ok_or(BankError::CardNotFound)?;
        let account = self
            .store
            .get_account_by_id(account_id)
            .await?
            .ok_or(BankError::AccountNotFound)?;

        if card.balance < amount {
            return Err(BankError::InsufficientFunds);
        }
        if amount > account.withdrawal_daily_limit {
            return Err(BankError::DailyWithdrawalLimitExceeded);
        }

        self.store.withdraw_from_card(card_id, amount).await?;
        let new_card_balance = card.balance - amount;
        let new_overall_balance = account.overall_balance - amount;
        self.store
            .update_account_balance(account_id, new_overall_balance)
            .await?;

        info!("Withdrew {} from card {}", amount, card_id);
        Ok(WithdrawalOutcome {
            overall_balance: new_overall_balance,
            card_balance: new_card_balance,
            remaining_withdrawal_limit: account.withdrawal_daily_limit - amount,
        })
    }

    /// Move funds between two cards of the same account
    ///
    /// No daily limit applies; the transfer cap only binds external
    /// transfers. The reported overall balance degrades to zero when the
    /// account lookup misses or errors — callers rely on that fallback.
    pub async fn internal_transfer(
        &self,
        account_id: Uuid,
        sender_card_id: Uuid,
        recipient_card_id: Uuid,
        amount: Decimal,
    ) -> BankResult<InternalTransferOutcome> {
        if amount <= Decimal::ZERO {
            return Err(BankError::AmountNotPositive);
        }

        let sender_card = self
            .store
            .get_card_by_id(sender_card_id)
            .await?
            .ok_or(BankError::SenderCardNotFound)?;
        let recipient_card = self
            .store
            .get_card_by_id(recipient_card_id)
            .await?
            .ok_or(BankError::RecipientCardNotFound)?;

        if sender_card.balance < amount {
            return Err(BankError::InsufficientFunds);
        }

        let new_sender_balance = sender_card.balance - amount;
        let new_recipient_balance = recipient_card.balance + amount;
        self.store
            .update_card_balance(sender_card_id, new_sender_balance)
            .await?;
        self.store
            .update_card_balance(recipient_card_id, new_recipient_balance)
            .await?;

        let overall_balance = match self.store.get_account_by_id(account_id).await {
            Ok(Some(account)) => account.overall_balance,
            Ok(None) => Decimal::ZERO,
            Err(e) => {
                warn!("Account lookup failed after internal transfer: {}", e);
                Decimal::ZERO
            }
        };

        info!(
            "Transferred {} from card {} to card {}",
            amount, sender_card_id, recipient_card_id
        );
        Ok(InternalTransferOutcome {
            sender_card_balance: new_sender_balance,
            recipient_card_balance: new_recipient_balance,
            overall_balance,
        })
    }

    /// Move funds from a card to another account's default card
    ///
    /// The receiver's reported overall balance is computed from the
    /// snapshot fetched before the writes (`snapshot + amount`), never
    /// re-read. That arithmetic is part of the response contract.
    pub async fn external_transfer(
        &self,
        sender_account_id: Uuid,
        sender_card_id: Uuid,
        receiver_account_number: &str,
        amount: Decimal,
    ) -> BankResult<ExternalTransferOutcome> {
        if amount <= Decimal::ZERO {
            return Err(BankError::AmountNotPositive);
        }

        let sender_card = self
            .store
            .get_card_by_id(sender_card_id)
            .await?
            .ok_or(BankError::SenderCardNotFound)?;
        let sender_account = self
            .store
            .get_account_by_id(sender_account_id)
            .await?
            .ok_or(BankError::SenderAccountNotFound)?;

        if sender_card.balance < amount {
            return Err(BankError::InsufficientFunds);
        }
        if amount > sender_account.transfer_daily_limit {
            return Err(BankError::DailyTransferLimitExceeded);
        }

        let receiver_account = self
            .store
            .get_account_by_number(receiver_account_number)
            .await?
            .ok_or(BankError::InvalidAccount)?;
        let receiver_card = self
            .store
            .get_card_by_id(receiver_account.default_card)
            .await?
            .ok_or(BankError::ReceiverCardNotFound)?;

        self.store.withdraw_from_card(sender_card_id, amount).await?;
        let new_sender_card_balance = sender_card.balance - amount;
        let new_sender_overall_balance = sender_account.overall_balance - amount;
        self.store
            .update_account_balance(sender_account_id, new_sender_overall_balance)
            .await?;
        self.store
            .update_card_balance(sender_card_id, new_sender_card_balance)
            .await?;

        let new_receiver_card_balance = receiver_card.balance + amount;
        self.store
            .update_card_balance(receiver_card.id, new_receiver_card_balance)
            .await?;

        info!(
            "Transferred {} from card {} to account {}",
            amount, sender_card_id, receiver_account.id
        );
        Ok(ExternalTransferOutcome {
            sender: SenderOutcome {
                overall_balance: new_sender_overall_balance,
                card_balance: new_sender_card_balance,
                remaining_transfer_limit: sender_account.transfer_daily_limit - amount,
            },
            receiver: ReceiverOutcome {
                overall_balance: receiver_account.overall_balance + amount,
                card_balance: new_receiver_card_balance,
            },
        })
    }

    /// Read-only financial snapshot of an account
    pub async fn financial_info(&self, account_number: &str) -> BankResult<FinancialInfo> {
        let account = self
            .store
            .get_account_by_number(account_number)
            .await?
            .ok_or(BankError::AccountNotFound)?;

        let cards = self.store.get_cards_for_account(account.id).await?;
        let recent_transactions = self.store.get_transactions_for_account(account.id).await?;

        Ok(FinancialInfo {
            account_number: account.account_number,
            overall_balance: account.overall_balance,
            withdrawal_daily_limit: account.withdrawal_daily_limit,
            transfer_daily_limit: account.transfer_daily_limit,
            default_card: account.default_card,
            cards: cards.iter().map(CardSummary::from).collect(),
            recent_transactions,
        })
    }
}
