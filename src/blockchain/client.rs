//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (Infura or an explicit URL)
//! - Query chain state (chain id, receipts)
//! - Bound every call with the configured RPC timeout

use alloy::network::Ethereum;
use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, Receipt};
use crate::config::ChainConfig;

/// Read-only JSON-RPC client, built once and shared between requests.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: DynProvider<Ethereum>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No network round-trip happens here; use [`Self::verify_chain_id`] to
    /// probe the endpoint.
    pub fn new(config: &ChainConfig) -> BlockchainResult<Self> {
        let endpoint = config.endpoint();
        let url: url::Url = endpoint
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL: {}", e)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        tracing::info!(
            network = %config.network,
            chain_id = config.chain_id,
            "Blockchain client initialized"
        );

        Ok(Self {
            provider,
            config: config.clone(),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(ChainId(id)),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Get a transaction receipt by hash; `None` while still pending.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<Receipt>> {
        let fut = self.provider.get_transaction_receipt(tx_hash);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(Some(receipt))) => Ok(Some(Receipt {
                status: receipt.status(),
                block_number: receipt.block_number.unwrap_or_default(),
            })),
            Ok(Ok(None)) => Ok(None),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("network", &self.config.network)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ChainConfig {
        ChainConfig {
            rpc_url: Some("http://127.0.0.1:1".to_string()),
            chain_id: 31337,
            rpc_timeout_secs: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_client_creation_is_offline() {
        let client = BlockchainClient::new(&test_config());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_verification() {
        let client = BlockchainClient::new(&test_config()).unwrap();
        let err = client.verify_chain_id().await.unwrap_err();
        assert!(matches!(err, BlockchainError::Rpc(_) | BlockchainError::Timeout(_)));
    }

    /// Minimal JSON-RPC node that answers `eth_chainId` with `chain_id`.
    async fn start_rpc_node(port: u16, chain_id: u64) -> String {
        use axum::{routing::post, Json, Router};
        use serde_json::{json, Value};

        let app = Router::new().route(
            "/",
            post(move |Json(request): Json<Value>| async move {
                Json(json!({
                    "jsonrpc": "2.0",
                    "id": request["id"],
                    "result": format!("0x{:x}", chain_id),
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://127.0.0.1:{}", port)
    }

    #[tokio::test]
    async fn test_matching_chain_id_verifies() {
        let config = ChainConfig {
            rpc_url: Some(start_rpc_node(28501, 31337).await),
            ..test_config()
        };
        let client = BlockchainClient::new(&config).unwrap();

        assert_eq!(client.get_chain_id().await.unwrap(), ChainId(31337));
        assert!(client.verify_chain_id().await.is_ok());
    }

    #[tokio::test]
    async fn test_chain_id_mismatch_is_reported() {
        let config = ChainConfig {
            rpc_url: Some(start_rpc_node(28502, 1).await),
            ..test_config()
        };
        let client = BlockchainClient::new(&config).unwrap();

        let err = client.verify_chain_id().await.unwrap_err();
        assert!(matches!(
            err,
            BlockchainError::ChainMismatch {
                expected: 31337,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = ChainConfig {
            rpc_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let err = BlockchainClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }
}
