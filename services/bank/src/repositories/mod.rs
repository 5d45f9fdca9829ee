//! Store collaborators
//!
//! The domain services consume the [`UserStore`] and [`TransactionStore`]
//! traits; the `Pg*` types are the sqlx-backed production implementations.

pub mod transaction;
pub mod user;

pub use transaction::{PgTransactionRepository, TransactionStore};
pub use user::{PgUserRepository, UserStore};
