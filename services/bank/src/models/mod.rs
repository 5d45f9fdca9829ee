//! Banking service models

pub mod account;
pub mod card;
pub mod transaction;
pub mod user;

// Re-export for convenience
pub use account::{Account, AccountWithNumber};
pub use card::{Card, CardBrand};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
pub use user::{PublicUser, User};
