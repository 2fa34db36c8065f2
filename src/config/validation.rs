//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics and returns every
//! problem found, not just the first.

use alloy::primitives::Address;
use std::fmt;

use crate::config::schema::ServiceConfig;
use crate::imx::types::parse_stark_key;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.accounts.register_user_key.is_empty() {
        errors.push(ValidationError::new("REGISTER_USER", "private key is required"));
    }
    if config.accounts.owner_private_key.is_empty() {
        errors.push(ValidationError::new("OWNER_PRIVATE_KEY", "private key is required"));
    }

    check_stark_key(
        &mut errors,
        "REGISTER_USER_STARK_KEY",
        &config.accounts.register_user_stark_key,
    );
    check_stark_key(&mut errors, "OWNER_STARK_KEY", &config.accounts.owner_stark_key);

    if config.imx.public_api_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            "PUBLIC_API_URL",
            format!("'{}' is not a valid URL", config.imx.public_api_url),
        ));
    }

    if config.chain.rpc_url.is_none() && config.chain.infura_api_key.is_empty() {
        errors.push(ValidationError::new(
            "INFURA_API_KEY",
            "either INFURA_API_KEY or ETH_RPC_URL must be set",
        ));
    }

    check_address(&mut errors, "STARK_CONTRACT_ADDRESS", &config.imx.stark_contract_address);
    check_address(&mut errors, "REGISTRATION_ADDRESS", &config.imx.registration_address);
    check_address(&mut errors, "TOKEN_ADDRESS", &config.mint.token_address);
    check_address(&mut errors, "MINT_RECIPIENT", &config.mint.default_wallet);

    if config.mint.bulk_mint_max == 0 {
        errors.push(ValidationError::new("BULK_MINT_MAX", "must be greater than zero"));
    }
    if config.chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "RECEIPT_POLL_INTERVAL_MS",
            "must be greater than zero",
        ));
    }
    if config.chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "CONFIRMATION_TIMEOUT_SECS",
            "must be greater than zero",
        ));
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("RPC_TIMEOUT_SECS", "must be greater than zero"));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("REQUEST_TIMEOUT_SECS", "must be greater than zero"));
    } else if config.server.request_timeout_secs <= min_request_timeout_secs(config) {
        errors.push(ValidationError::new(
            "REQUEST_TIMEOUT_SECS",
            format!(
                "must exceed {} seconds (confirmation deadline plus RPC and API timeouts)",
                min_request_timeout_secs(config)
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A mint spends up to two RPC and two API round-trips around the
/// confirmation wait; the HTTP timeout must not cut that short.
pub fn min_request_timeout_secs(config: &ServiceConfig) -> u64 {
    config
        .chain
        .confirmation_timeout_secs
        .saturating_add(config.chain.rpc_timeout_secs.saturating_mul(2))
        .saturating_add(config.imx.api_timeout_secs.saturating_mul(2))
}

fn check_stark_key(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "stark public key is required"));
    } else if parse_stark_key(value).is_err() {
        errors.push(ValidationError::new(field, format!("'{}' is not a hex stark key", value)));
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.push(ValidationError::new(field, "address is required"));
    } else if value.parse::<Address>().is_err() {
        errors.push(ValidationError::new(field, format!("'{}' is not a valid address", value)));
    }
}
