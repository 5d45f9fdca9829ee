//! Banking service routes
//!
//! Handlers translate request bodies into domain-service calls and domain
//! errors into the HTTP status contract via [`BankError`]'s `IntoResponse`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{BankError, BankResult};
use crate::middleware::auth_middleware;
use crate::validation::validate_pin;

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub pin: Option<String>,
}

/// Request for PIN change
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePinRequest {
    pub user_id: Option<String>,
    pub old_pin: Option<String>,
    pub new_pin: Option<String>,
}

/// Request for a deposit
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub account_number: Option<String>,
    pub deposit_amount: Option<Decimal>,
}

/// Request for a withdrawal
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub account_id: Option<Uuid>,
    pub card_id: Option<Uuid>,
    pub withdrawal_amount: Option<Decimal>,
}

/// Request for a transfer between two cards of the same account
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalTransferRequest {
    pub account_id: Option<Uuid>,
    pub sender_card_id: Option<Uuid>,
    pub recipient_card_id: Option<Uuid>,
    pub transfer_amount: Option<Decimal>,
}

/// Request for a transfer to another account
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTransferRequest {
    pub sender_account_id: Option<Uuid>,
    pub sender_card_id: Option<Uuid>,
    pub receiver_account_number: Option<String>,
    pub transfer_amount: Option<Decimal>,
}

/// Create the router for the banking service
pub fn create_router(state: AppState) -> Router {
    let transaction_routes = Router::new()
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/internal-transfer", post(internal_transfer))
        .route("/external-transfer", post(external_transfer))
        .route("/financial-info/:account_number", get(financial_info))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/change-pin", post(change_pin))
        .nest("/transactions", transaction_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "bank-service"
    }))
}

fn required<T>(value: Option<T>) -> BankResult<T> {
    value.ok_or(BankError::MissingParameters)
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> BankResult<impl IntoResponse> {
    let identifier = required(payload.identifier)?;
    let pin = required(payload.pin)?;

    info!("Login attempt for account {}", identifier);
    let outcome = state.auth_service.login(&identifier, &pin).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "user": {
                "id": outcome.user.id,
                "accountNumber": outcome.user.account_number,
            },
            "token": outcome.token,
            "timeToLive": outcome.time_to_live,
        })),
    ))
}

/// PIN change endpoint
pub async fn change_pin(
    State(state): State<AppState>,
    Json(payload): Json<ChangePinRequest>,
) -> BankResult<impl IntoResponse> {
    let user_id = required(payload.user_id)?;
    let old_pin = required(payload.old_pin)?;
    let new_pin = required(payload.new_pin)?;

    validate_pin(&new_pin).map_err(BankError::InvalidParameters)?;

    state
        .auth_service
        .change_pin(&user_id, &old_pin, &new_pin)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({"message": "PIN changed successfully"})),
    ))
}

/// Deposit endpoint
pub async fn deposit(
    State(state): State<AppState>,
    Json(payload): Json<DepositRequest>,
) -> BankResult<impl IntoResponse> {
    let account_number = required(payload.account_number)?;
    let amount = required(payload.deposit_amount)?;

    state
        .transaction_service
        .deposit(&account_number, amount)
        .await?;

    Ok((StatusCode::OK, Json(json!({"message": "Deposit successful"}))))
}

/// Withdrawal endpoint
pub async fn withdraw(
    State(state): State<AppState>,
    Json(payload): Json<WithdrawRequest>,
) -> BankResult<impl IntoResponse> {
    let account_id = required(payload.account_id)?;
    let card_id = required(payload.card_id)?;
    let amount = required(payload.withdrawal_amount)?;

    let outcome = state
        .transaction_service
        .withdraw(account_id, card_id, amount)
        .await?;

    Ok((StatusCode::OK, Json(outcome)))
}

/// Same-account transfer endpoint
pub async fn internal_transfer(
    State(state): State<AppState>,
    Json(payload): Json<InternalTransferRequest>,
) -> BankResult<impl IntoResponse> {
    let account_id = required(payload.account_id)?;
    let sender_card_id = required(payload.sender_card_id)?;
    let recipient_card_id = required(payload.recipient_card_id)?;
    let amount = required(payload.transfer_amount)?;

    let outcome = state
        .transaction_service
        .internal_transfer(account_id, sender_card_id, recipient_card_id, amount)
        .await?;

    Ok((StatusCode::OK, Json(outcome)))
}

/// Cross-account transfer endpoint
pub async fn external_transfer(
    State(state): State<AppState>,
    Json(payload): Json<ExternalTransferRequest>,
) -> BankResult<impl IntoResponse> {
    let sender_account_id = required(payload.sender_account_id)?;
    let sender_card_id = required(payload.sender_card_id)?;
    let receiver_account_number = required(payload.receiver_account_number)?;
    let amount = required(payload.transfer_amount)?;

    let outcome = state
        .transaction_service
        .external_transfer(
            sender_account_id,
            sender_card_id,
            &receiver_account_number,
            amount,
        )
        .await?;

    Ok((StatusCode::OK, Json(outcome)))
}

/// Read-only financial snapshot endpoint
pub async fn financial_info(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> BankResult<impl IntoResponse> {
    let info = state
        .transaction_service
        .financial_info(&account_number)
        .await?;

    Ok((StatusCode::OK, Json(info)))
}
