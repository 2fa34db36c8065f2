//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the minter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration for the minting service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Base chain (JSON-RPC) settings.
    pub chain: ChainConfig,

    /// Layer-2 platform settings.
    pub imx: ImxConfig,

    /// Signing accounts.
    pub accounts: AccountsConfig,

    /// Bulk mint settings.
    pub mint: MintConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A value that must never show up in logs.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<unset>)")
        } else {
            f.write_str("Secret(<redacted>)")
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,

    /// Bind port (`PORT`).
    pub port: u16,

    /// Upper bound on a single request, confirmation waits included.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 900,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Base chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Network name used for the Infura endpoint and explorer links.
    pub network: String,

    /// Infura project key (`INFURA_API_KEY`).
    pub infura_api_key: Secret,

    /// Explicit JSON-RPC endpoint; takes precedence over Infura.
    pub rpc_url: Option<String>,

    /// Chain ID used when signing transactions.
    pub chain_id: u64,

    /// Per-call RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Interval between receipt polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Deadline for a confirmation wait in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network: "ropsten".to_string(),
            infura_api_key: Secret::default(),
            rpc_url: None,
            chain_id: 3,
            rpc_timeout_secs: 10,
            poll_interval_ms: 4_000,
            confirmation_timeout_secs: 600,
        }
    }
}

impl ChainConfig {
    /// Resolve the JSON-RPC endpoint.
    pub fn endpoint(&self) -> String {
        match &self.rpc_url {
            Some(url) => url.clone(),
            None => format!(
                "https://{}.infura.io/v3/{}",
                self.network,
                self.infura_api_key.expose()
            ),
        }
    }
}

/// Layer-2 platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImxConfig {
    /// Public REST API base URL (`PUBLIC_API_URL`).
    pub public_api_url: String,

    /// Core stark contract (`STARK_CONTRACT_ADDRESS`).
    pub stark_contract_address: String,

    /// User registration contract (`REGISTRATION_ADDRESS`).
    pub registration_address: String,

    /// Gas limit for on-chain registration (`GAS_LIMIT`).
    pub gas_limit: Option<u64>,

    /// Gas price in wei for on-chain registration (`GAS_PRICE`).
    pub gas_price: Option<u128>,

    /// Timeout for REST calls in seconds.
    pub api_timeout_secs: u64,
}

impl Default for ImxConfig {
    fn default() -> Self {
        Self {
            public_api_url: "https://api.ropsten.x.immutable.com".to_string(),
            stark_contract_address: String::new(),
            registration_address: String::new(),
            gas_limit: None,
            gas_price: None,
            api_timeout_secs: 30,
        }
    }
}

/// Signing identities.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AccountsConfig {
    /// Private key of the account registered by `/signInUser` (`REGISTER_USER`).
    pub register_user_key: Secret,

    /// Stark public key belonging to `register_user_key`.
    pub register_user_stark_key: String,

    /// Private key of the minter (`OWNER_PRIVATE_KEY`).
    pub owner_private_key: Secret,

    /// Stark public key belonging to the minter.
    pub owner_stark_key: String,
}

/// Bulk mint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MintConfig {
    /// Mintable token contract (`TOKEN_ADDRESS`).
    pub token_address: String,

    /// First token id of a batch (`tokenId`).
    pub base_token_id: u64,

    /// Exclusive upper bound on tokens per request (`BULK_MINT_MAX`).
    pub bulk_mint_max: u64,

    /// Metadata blueprint attached to every token.
    pub blueprint: String,

    /// Recipient used when the request names none.
    pub default_wallet: String,

    /// Token count used when the request names none.
    pub default_count: u64,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            token_address: String::new(),
            base_token_id: 0,
            bulk_mint_max: 50,
            blueprint: "onchain-metadata".to_string(),
            default_wallet: "0x84daa703e1cbad82416a1122c7c4e213b64eba44".to_string(),
            default_count: 1,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
