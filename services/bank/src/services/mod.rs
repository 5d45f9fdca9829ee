//! Domain services
//!
//! The business rules live here: login lockout and PIN lifecycle in
//! [`auth`], balance and limit enforcement in [`transactions`]. Both
//! services are stateless between calls and talk to their collaborators
//! through injected trait objects.

pub mod auth;
pub mod transactions;

#[cfg(test)]
pub mod testing;

pub use auth::AuthService;
pub use transactions::TransactionService;
