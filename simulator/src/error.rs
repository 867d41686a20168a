//! Server errors and their HTTP rendering.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use cbs_common::CbsError;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] CbsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Key naming the account in a not-found payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKey {
    /// `/cbs/*` routes.
    AccountId,
    /// `/api/*` routes.
    AccountNumber,
}

impl AccountKey {
    fn as_str(self) -> &'static str {
        match self {
            AccountKey::AccountId => "accountId",
            AccountKey::AccountNumber => "accountNumber",
        }
    }
}

/// An error response: status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// Render a ledger error, naming accounts with `key`.
    pub fn from_ledger(err: &CbsError, key: AccountKey) -> Self {
        match err {
            CbsError::MissingFields { what, required } => Self::new(
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("Missing {what}"), "required": required }),
            ),
            CbsError::InvalidAmount(amount) => Self::new(
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid amount", "amount": amount }),
            ),
            CbsError::InvalidTransactionKind(kind) => Self::new(
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid transaction type",
                    "type": kind,
                    "allowed": ["credit", "debit"],
                }),
            ),
            CbsError::AccountNotFound(id) => {
                let mut body = json!({ "error": "Account not found" });
                body[key.as_str()] = json!(id);
                Self::new(StatusCode::NOT_FOUND, body)
            }
            CbsError::AccountsNotFound { from, to, missing } => Self::new(
                StatusCode::NOT_FOUND,
                json!({
                    "error": "One or more accounts not found",
                    "from": from,
                    "to": to,
                    "missing": missing,
                }),
            ),
            CbsError::CustomerNotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                json!({ "error": "Customer not found", "customerId": id }),
            ),
            CbsError::InsufficientFunds { available, requested } => Self::new(
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Insufficient funds",
                    "available": available,
                    "requested": requested,
                }),
            ),
            CbsError::AmountOutOfRange { account, balance, amount } => Self::new(
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Amount out of range",
                    "account": account,
                    "balance": balance,
                    "amount": amount,
                }),
            ),
        }
    }

    /// Unknown route.
    pub fn route_not_found(path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            json!({
                "error": "Not found",
                "path": path,
                "message": "The requested endpoint does not exist",
            }),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error", "message": message.into() }),
        )
    }
}

impl From<CbsError> for ApiError {
    fn from(err: CbsError) -> Self {
        Self::from_ledger(&err, AccountKey::AccountId)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Invalid request body", "message": rejection.body_text() }),
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    }
}

/// Render a handler panic as a 500 error payload.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(payload.as_ref());
    tracing::error!(%message, "Handler panicked");
    ApiError::internal(message).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbs_common::AccountId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_key_selects_field() {
        let err = CbsError::AccountNotFound(AccountId::new("Z999"));

        let cbs = ApiError::from_ledger(&err, AccountKey::AccountId);
        assert_eq!(cbs.status, StatusCode::NOT_FOUND);
        assert_eq!(cbs.body["accountId"], "Z999");

        let api = ApiError::from_ledger(&err, AccountKey::AccountNumber);
        assert_eq!(api.body["accountNumber"], "Z999");
        assert!(api.body.get("accountId").is_none());
    }

    #[test]
    fn test_missing_fields_payload() {
        let err = CbsError::MissingFields {
            what: "transfer details",
            required: &["from", "to", "amount"],
        };
        let api: ApiError = err.into();

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            api.body,
            json!({ "error": "Missing transfer details", "required": ["from", "to", "amount"] })
        );
    }

    #[test]
    fn test_insufficient_funds_amounts_are_numbers() {
        let api: ApiError = CbsError::InsufficientFunds {
            available: dec!(15850.75),
            requested: dec!(999999),
        }
        .into();

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.body["available"].as_f64(), Some(15850.75));
        assert_eq!(api.body["requested"].as_f64(), Some(999999.0));
    }

    #[test]
    fn test_amount_out_of_range_is_client_error() {
        let api: ApiError = CbsError::AmountOutOfRange {
            account: AccountId::new("A002"),
            balance: dec!(125000),
            amount: dec!(10000),
        }
        .into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.body["error"], "Amount out of range");
        assert_eq!(api.body["account"], "A002");
    }

    #[tokio::test]
    async fn test_panic_renders_internal_error() {
        let response = panic_response(Box::new(String::from("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Internal server error", "message": "boom" }));
    }

    #[test]
    fn test_route_not_found_payload() {
        let api = ApiError::route_not_found("/nope");
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.body["path"], "/nope");
        assert_eq!(api.body["error"], "Not found");
    }
}
