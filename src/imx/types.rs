//! Wire types of the layer-2 REST API.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::imx::error::{Layer2Error, Layer2Result};

/// A user known to the layer-2 platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stark public keys bound to the user's ether key.
    pub accounts: Vec<String>,
}

/// Outcome of a registration attempt.
///
/// An empty `tx_hash` means the user was already registered and nothing was
/// submitted on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub tx_hash: String,
}

impl RegistrationResult {
    pub fn already_registered() -> Self {
        Self {
            tx_hash: String::new(),
        }
    }

    pub fn needs_confirmation(&self) -> bool {
        !self.tx_hash.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignableRegistrationRequest {
    pub ether_key: String,
    pub stark_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SignableRegistrationResponse {
    pub operator_signature: String,
}

/// One token in a mint batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintToken {
    pub id: String,
    pub blueprint: String,
}

/// Tokens going to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintUser {
    #[serde(rename = "user")]
    pub ether_key: String,
    pub tokens: Vec<MintToken>,
}

/// A mint request against one mintable token contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub contract_address: String,
    pub users: Vec<MintUser>,
}

/// A mint request carrying the minter's signature over its payload.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignedMintRequest<'a> {
    #[serde(flatten)]
    pub request: &'a MintRequest,
    pub auth_signature: String,
}

/// Lower-case `0x` address, the form the platform indexes users by.
pub fn ether_key(address: Address) -> String {
    address.to_string().to_lowercase()
}

/// Parse a `0x`-prefixed hex stark public key.
pub fn parse_stark_key(stark_key: &str) -> Layer2Result<U256> {
    let hex = stark_key.trim();
    let hex = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);
    if hex.is_empty() {
        return Err(Layer2Error::InvalidStarkKey(stark_key.to_string()));
    }
    U256::from_str_radix(hex, 16).map_err(|_| Layer2Error::InvalidStarkKey(stark_key.to_string()))
}
