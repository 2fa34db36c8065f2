//! Request signing for authenticated layer-2 endpoints.

use alloy::primitives::{hex, keccak256};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::blockchain::Wallet;
use crate::imx::error::{Layer2Error, Layer2Result};
use crate::imx::types::MintRequest;

pub const TIMESTAMP_HEADER: &str = "imx-timestamp";
pub const SIGNATURE_HEADER: &str = "imx-signature";

/// `imx-timestamp` / `imx-signature` header values for the current second.
pub async fn auth_headers(wallet: &Wallet) -> Layer2Result<(String, String)> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string();
    let signature = wallet.sign_message(timestamp.as_bytes()).await?;
    Ok((timestamp, hex::encode_prefixed(signature.as_bytes())))
}

/// Signature over the keccak hash of the serialised mint payload.
pub async fn sign_mint_request(wallet: &Wallet, request: &MintRequest) -> Layer2Result<String> {
    let payload = serde_json::to_vec(request).map_err(|e| Layer2Error::Decode(e.to_string()))?;
    let digest = hex::encode_prefixed(keccak256(&payload));
    let signature = wallet.sign_message(digest.as_bytes()).await?;
    Ok(hex::encode_prefixed(signature.as_bytes()))
}
