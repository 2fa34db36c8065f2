//! Mapping of flow errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::blockchain::BlockchainError;
use crate::minting::MintError;
use crate::users::RegisterUserError;

/// Every failure a handler can report. Always rendered as
/// `{"error": "...", "kind": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    SignIn(RegisterUserError),
    Mint(MintError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::SignIn(RegisterUserError::Client(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SignIn(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Mint(e) => match e {
                MintError::TooManyTokens { .. } | MintError::TokenIdOverflow { .. } => {
                    StatusCode::BAD_REQUEST
                }
                MintError::Client(_) => StatusCode::SERVICE_UNAVAILABLE,
                MintError::Confirmation(BlockchainError::ConfirmationTimeout { .. }) => {
                    StatusCode::GATEWAY_TIMEOUT
                }
                MintError::Registration(_) | MintError::Confirmation(_) | MintError::Mint(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::SignIn(e) => match e {
                RegisterUserError::Client(_) => "client_unavailable",
                RegisterUserError::Lookup(_) => "user_lookup_failed",
                RegisterUserError::Registration(_) => "user_registration_failed",
            },
            Self::Mint(e) => match e {
                MintError::TooManyTokens { .. } => "too_many_tokens",
                MintError::TokenIdOverflow { .. } => "token_id_overflow",
                MintError::Client(_) => "client_unavailable",
                MintError::Registration(_) => "minter_registration_failed",
                MintError::Confirmation(BlockchainError::Rejected { .. }) => "transaction_rejected",
                MintError::Confirmation(BlockchainError::ConfirmationTimeout { .. }) => {
                    "confirmation_timeout"
                }
                MintError::Confirmation(_) => "confirmation_failed",
                MintError::Mint(_) => "mint_failed",
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::SignIn(e) => e.to_string(),
            Self::Mint(e) => e.to_string(),
        }
    }
}

impl From<RegisterUserError> for ApiError {
    fn from(e: RegisterUserError) -> Self {
        Self::SignIn(e)
    }
}

impl From<MintError> for ApiError {
    fn from(e: MintError) -> Self {
        Self::Mint(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(
                status = %status,
                kind = self.kind(),
                error = %self.message(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                status = %status,
                kind = self.kind(),
                error = %self.message(),
                "Request rejected"
            );
        }
        let body = json!({ "error": self.message(), "kind": self.kind() });
        (status, Json(body)).into_response()
    }
}
