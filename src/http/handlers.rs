//! Request handlers.

use alloy::primitives::Address;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::users::SignInOutcome;

pub const LIVENESS_MESSAGE: &str = "imx-minter is live";

pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn sign_in_user(
    State(state): State<AppState>,
) -> Result<Json<SignInOutcome>, ApiError> {
    let outcome = state.users.sign_in().await?;
    Ok(Json(outcome))
}

/// Query string of `/mint`; both fields fall back to configuration.
#[derive(Debug, Default, Deserialize)]
pub struct MintParams {
    pub wallet: Option<String>,
    pub number: Option<u64>,
}

pub async fn mint(
    State(state): State<AppState>,
    params: Result<Query<MintParams>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let defaults = state.minter.config();

    let wallet = params.wallet.as_deref().unwrap_or(&defaults.default_wallet);
    let recipient: Address = wallet.parse().map_err(|_| {
        ApiError::BadRequest(format!("'{}' is not a valid wallet address", wallet))
    })?;
    let count = params.number.unwrap_or(defaults.default_count);

    let result = state.minter.bulk_mint(recipient, count).await?;
    Ok(Json(result))
}
