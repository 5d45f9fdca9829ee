//! Domain error taxonomy and its mapping to the HTTP status contract

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;

/// Fixed user-facing message for the generic 500 path. Internal details
/// never leak to the caller.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Fixed user-facing message for collaborator outages.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The service is currently unavailable, please try again later.";

/// Errors raised by the auth and transaction domain services
#[derive(Error, Debug)]
pub enum BankError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("User is blocked")]
    UserBlocked,

    #[error("Too many failed attempts")]
    TooManyFailedAttempts,

    #[error("New PIN cannot be the same as the old PIN")]
    SameNewOldPin,

    #[error("Invalid Account")]
    InvalidAccount,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Card not found")]
    CardNotFound,

    #[error("Sender card not found")]
    SenderCardNotFound,

    #[error("Recipient card not found")]
    RecipientCardNotFound,

    #[error("Sender account not found")]
    SenderAccountNotFound,

    #[error("Receiver card not found")]
    ReceiverCardNotFound,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Daily withdrawal limit exceeded")]
    DailyWithdrawalLimitExceeded,

    #[error("Daily transfer limit exceeded")]
    DailyTransferLimitExceeded,

    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Deposit amount must be positive")]
    DepositAmountNotPositive,

    #[error("Amount must be positive")]
    AmountNotPositive,

    #[error("{0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BankError {
    /// HTTP status code for this error
    ///
    /// Not-found conditions inside transfers stay on the generic 500 path;
    /// callers never learn which leg of the transfer failed.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BankError::Unauthorized => StatusCode::UNAUTHORIZED,
            BankError::UserBlocked => StatusCode::FORBIDDEN,
            BankError::TooManyFailedAttempts => StatusCode::TOO_MANY_REQUESTS,
            BankError::SameNewOldPin
            | BankError::MissingParameters
            | BankError::DepositAmountNotPositive
            | BankError::AmountNotPositive
            | BankError::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            BankError::InvalidAccount | BankError::AccountNotFound | BankError::CardNotFound => {
                StatusCode::NOT_FOUND
            }
            BankError::InsufficientFunds
            | BankError::DailyWithdrawalLimitExceeded
            | BankError::DailyTransferLimitExceeded => StatusCode::UNPROCESSABLE_ENTITY,
            BankError::Database(DatabaseError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            BankError::SenderCardNotFound
            | BankError::RecipientCardNotFound
            | BankError::SenderAccountNotFound
            | BankError::ReceiverCardNotFound
            | BankError::Database(_)
            | BankError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message for this error
    fn public_message(&self) -> String {
        match self {
            BankError::Database(DatabaseError::Connection(_)) => {
                SERVICE_UNAVAILABLE_MESSAGE.to_string()
            }
            err if err.status_code() == StatusCode::INTERNAL_SERVER_ERROR => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
            err => err.to_string(),
        }
    }
}

impl IntoResponse for BankError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

/// Type alias for domain results
pub type BankResult<T> = Result<T, BankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_errors_map_to_the_documented_statuses() {
        assert_eq!(BankError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BankError::UserBlocked.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            BankError::TooManyFailedAttempts.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn transaction_errors_map_to_the_documented_statuses() {
        assert_eq!(BankError::InvalidAccount.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BankError::AccountNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BankError::CardNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            BankError::InsufficientFunds.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            BankError::DailyWithdrawalLimitExceeded.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            BankError::DailyTransferLimitExceeded.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(BankError::MissingParameters.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(BankError::SameNewOldPin.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn transfer_lookup_failures_degrade_to_the_generic_path() {
        for err in [
            BankError::SenderCardNotFound,
            BankError::RecipientCardNotFound,
            BankError::SenderAccountNotFound,
            BankError::ReceiverCardNotFound,
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn connection_outage_maps_to_service_unavailable() {
        let err = BankError::Database(DatabaseError::Connection(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.public_message(), SERVICE_UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn internal_errors_never_leak_details() {
        let err = BankError::Internal(anyhow::anyhow!("pin column corrupt"));
        assert_eq!(err.public_message(), GENERIC_ERROR_MESSAGE);
    }
}
