//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use cbs_common::{now, uptime_seconds, AccountId, CbsError, Currency, CustomerId};
use cbs_ledger::{
    Account, AccountStatement, Customer, CustomerProfile, PostingReceipt, PostingRequest,
    Transaction, TransferReceipt, TransferRequest,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{AccountKey, ApiError};
use crate::AppState;

pub const SERVICE_NAME: &str = "CBS Simulator";

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub receipt: TransferReceipt,
}

#[derive(Debug, Serialize)]
pub struct PostingResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub receipt: PostingReceipt,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub account_number: AccountId,
    pub balance: Decimal,
    pub currency: Currency,
}

impl AppState {
    /// Pass a lookup result through, counting misses.
    fn lookup<T>(&self, result: cbs_common::Result<T>) -> cbs_common::Result<Json<T>> {
        result.map(Json).map_err(|err| {
            if err.is_not_found() {
                self.metrics.lookup_not_found();
            }
            err
        })
    }

    /// Lookup on an `/api/*` route, where accounts are named `accountNumber`.
    fn api_lookup<T>(&self, result: cbs_common::Result<T>) -> Result<Json<T>, ApiError> {
        self.lookup(result)
            .map_err(|err| ApiError::from_ledger(&err, AccountKey::AccountNumber))
    }
}

/// Service banner.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": now(),
        "uptime": uptime_seconds(state.started_at),
        "port": state.config.port,
        "environment": state.config.environment,
    }))
}

/// Liveness check; 503 unless the service is running.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let current = state.lifecycle.state();
    if !current.is_operational() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "state": current.as_str() })),
        )
            .into_response();
    }

    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": now(),
        "uptime": uptime_seconds(state.started_at),
    }))
    .into_response()
}

/// Prometheus text exposition.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.to_prometheus(),
    )
}

pub async fn list_customers(State(state): State<AppState>) -> Json<Vec<Customer>> {
    Json(state.engine.store().list_customers())
}

pub async fn list_accounts(State(state): State<AppState>) -> Json<Vec<Account>> {
    Json(state.engine.store().list_accounts())
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerProfile>, ApiError> {
    let result = state.engine.store().get_customer_profile(&CustomerId::new(id));
    Ok(state.lookup(result)?)
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let result = state.engine.store().get_account(&AccountId::new(id));
    Ok(state.lookup(result)?)
}

pub async fn get_account_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let result = state.engine.store().get_history(&AccountId::new(id));
    Ok(state.lookup(result)?)
}

pub async fn get_statement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountStatement>, ApiError> {
    let result = state.engine.store().get_statement(&AccountId::new(id));
    Ok(state.lookup(result)?)
}

pub async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError> {
    let result = payload
        .map_err(ApiError::from)
        .and_then(|Json(request)| state.engine.transfer(request).map_err(ApiError::from));

    match result {
        Ok(receipt) => {
            state.metrics.transfer_succeeded();
            Ok(Json(TransferResponse {
                message: "Transfer successful",
                receipt,
            }))
        }
        Err(err) => {
            state.metrics.transfer_rejected();
            Err(err)
        }
    }
}

pub async fn api_get_account(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let result = state.engine.store().get_account(&AccountId::new(account_number));
    state.api_lookup(result)
}

pub async fn api_get_balance(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let result = state
        .engine
        .store()
        .get_account(&AccountId::new(account_number))
        .map(|account| BalanceResponse {
            account_number: account.id,
            balance: account.balance,
            currency: account.currency,
        });
    state.api_lookup(result)
}

pub async fn api_post_transaction(
    State(state): State<AppState>,
    payload: Result<Json<PostingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostingResponse>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        state.metrics.posting_rejected();
        ApiError::from(rejection)
    })?;

    match state.engine.post_transaction(request) {
        Ok(receipt) => {
            state.metrics.posting_succeeded();
            Ok((
                StatusCode::CREATED,
                Json(PostingResponse {
                    message: "Transaction processed successfully",
                    receipt,
                }),
            ))
        }
        Err(err) => {
            state.metrics.posting_rejected();
            if matches!(err, CbsError::AccountNotFound(_)) {
                state.metrics.lookup_not_found();
            }
            Err(ApiError::from_ledger(&err, AccountKey::AccountNumber))
        }
    }
}

/// Catch-all for unknown routes.
pub async fn fallback_handler(uri: Uri) -> ApiError {
    ApiError::route_not_found(uri.path())
}
