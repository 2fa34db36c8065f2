//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::config::schema::{Secret, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, then the environment.
///
/// A `.env` file in the working directory is read first; variables already
/// present in the process environment win over it.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    if let Ok(dotenv_path) = dotenvy::dotenv() {
        tracing::debug!(path = %dotenv_path.display(), "Loaded .env file");
    }
    load_config_with(path, |var| std::env::var(var).ok())
}

/// Same as [`load_config`] with an injectable variable lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env(&mut config, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env<F>(config: &mut ServiceConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    // server
    if let Some(v) = parse_var(lookup, "PORT")? {
        config.server.port = v;
    }
    if let Some(v) = parse_var(lookup, "REQUEST_TIMEOUT_SECS")? {
        config.server.request_timeout_secs = v;
    }

    // chain
    if let Some(v) = get("ETH_NETWORK") {
        config.chain.network = v;
    }
    if let Some(v) = get("INFURA_API_KEY") {
        config.chain.infura_api_key = Secret::new(v);
    }
    if let Some(v) = get("ETH_RPC_URL") {
        config.chain.rpc_url = Some(v);
    }
    if let Some(v) = parse_var(lookup, "CHAIN_ID")? {
        config.chain.chain_id = v;
    }
    if let Some(v) = parse_var(lookup, "RPC_TIMEOUT_SECS")? {
        config.chain.rpc_timeout_secs = v;
    }
    if let Some(v) = parse_var(lookup, "RECEIPT_POLL_INTERVAL_MS")? {
        config.chain.poll_interval_ms = v;
    }
    if let Some(v) = parse_var(lookup, "CONFIRMATION_TIMEOUT_SECS")? {
        config.chain.confirmation_timeout_secs = v;
    }

    // layer-2
    if let Some(v) = get("PUBLIC_API_URL") {
        config.imx.public_api_url = v;
    }
    if let Some(v) = get("STARK_CONTRACT_ADDRESS") {
        config.imx.stark_contract_address = v;
    }
    if let Some(v) = get("REGISTRATION_ADDRESS") {
        config.imx.registration_address = v;
    }
    if let Some(v) = parse_var(lookup, "GAS_LIMIT")? {
        config.imx.gas_limit = Some(v);
    }
    if let Some(v) = parse_var(lookup, "GAS_PRICE")? {
        config.imx.gas_price = Some(v);
    }

    // accounts
    if let Some(v) = get("REGISTER_USER") {
        config.accounts.register_user_key = Secret::new(v);
    }
    if let Some(v) = get("REGISTER_USER_STARK_KEY") {
        config.accounts.register_user_stark_key = v;
    }
    if let Some(v) = get("OWNER_PRIVATE_KEY") {
        config.accounts.owner_private_key = Secret::new(v);
    }
    if let Some(v) = get("OWNER_STARK_KEY") {
        config.accounts.owner_stark_key = v;
    }

    // mint
    if let Some(v) = get("TOKEN_ADDRESS") {
        config.mint.token_address = v;
    }
    if let Some(v) = parse_var(lookup, "tokenId")? {
        config.mint.base_token_id = v;
    }
    if let Some(v) = parse_var(lookup, "BULK_MINT_MAX")? {
        config.mint.bulk_mint_max = v;
    }
    if let Some(v) = get("MINT_BLUEPRINT") {
        config.mint.blueprint = v;
    }
    if let Some(v) = get("MINT_RECIPIENT") {
        config.mint.default_wallet = v;
    }
    if let Some(v) = parse_var(lookup, "MINT_COUNT")? {
        config.mint.default_count = v;
    }

    // observability
    if let Some(v) = get("LOG_LEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = parse_var(lookup, "METRICS_ENABLED")? {
        config.observability.metrics_enabled = v;
    }
    if let Some(v) = get("METRICS_ADDRESS") {
        config.observability.metrics_address = v;
    }

    Ok(())
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Env {
                var,
                message: format!("'{}': {}", raw, e),
            }),
        _ => Ok(None),
    }
}
