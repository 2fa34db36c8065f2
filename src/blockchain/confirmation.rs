//! Waiting for submitted transactions to be mined.
//!
//! The waiter logs the transaction id together with explorer links, polls
//! the provider for a receipt at a fixed interval and classifies the result.
//! Every wait is bounded by a deadline.

use alloy::primitives::TxHash;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, Receipt};
use crate::config::ChainConfig;
use crate::observability::metrics;

/// Anything that can be asked for the receipt of a transaction.
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    /// `Ok(None)` while the transaction is still pending.
    async fn receipt(&self, tx_id: &str) -> BlockchainResult<Option<Receipt>>;
}

#[async_trait]
impl ReceiptSource for BlockchainClient {
    async fn receipt(&self, tx_id: &str) -> BlockchainResult<Option<Receipt>> {
        let tx_hash: TxHash = tx_id
            .parse()
            .map_err(|_| BlockchainError::InvalidTxHash(tx_id.to_string()))?;
        self.get_transaction_receipt(tx_hash).await
    }
}

/// Builds block explorer links for a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLinks {
    network: String,
}

impl ExplorerLinks {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
        }
    }

    pub fn etherscan(&self, tx_id: &str) -> String {
        if self.network == "mainnet" {
            format!("https://etherscan.io/tx/{}", tx_id)
        } else {
            format!("https://{}.etherscan.io/tx/{}", self.network, tx_id)
        }
    }

    pub fn alchemy(&self, tx_id: &str) -> String {
        format!(
            "https://dashboard.alchemyapi.io/mempool/eth-{}/tx/{}",
            self.network, tx_id
        )
    }
}

/// Polls for a receipt until the transaction is mined or the deadline hits.
#[derive(Clone)]
pub struct ConfirmationWaiter {
    source: Arc<dyn ReceiptSource>,
    links: ExplorerLinks,
    poll_interval: Duration,
    deadline: Duration,
}

impl ConfirmationWaiter {
    pub fn new(
        source: Arc<dyn ReceiptSource>,
        links: ExplorerLinks,
        poll_interval: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            source,
            links,
            poll_interval,
            deadline,
        }
    }

    /// Build a waiter with the polling settings from `config`.
    pub fn from_config(source: Arc<dyn ReceiptSource>, config: &ChainConfig) -> Self {
        Self::new(
            source,
            ExplorerLinks::new(&config.network),
            Duration::from_millis(config.poll_interval_ms),
            Duration::from_secs(config.confirmation_timeout_secs),
        )
    }

    /// Resolve the pending transaction id, then wait for it.
    pub async fn wait_for<F>(&self, pending: F, component: &str) -> BlockchainResult<Receipt>
    where
        F: Future<Output = BlockchainResult<String>>,
    {
        let tx_id = pending.await?;
        self.wait_for_transaction(&tx_id, component).await
    }

    /// Wait for `tx_id` to be mined.
    ///
    /// Fails with [`BlockchainError::Rejected`] when the receipt status is 0
    /// and with [`BlockchainError::ConfirmationTimeout`] when no receipt shows
    /// up in time. Transient RPC errors are logged and polling continues.
    pub async fn wait_for_transaction(
        &self,
        tx_id: &str,
        component: &str,
    ) -> BlockchainResult<Receipt> {
        tracing::info!(
            component = %component,
            tx_id = %tx_id,
            etherscan_link = %self.links.etherscan(tx_id),
            alchemy_link = %self.links.alchemy(tx_id),
            "Waiting for transaction"
        );

        let started = Instant::now();
        let result = timeout(self.deadline, self.poll(tx_id, component)).await;

        let outcome = match result {
            Ok(Ok(receipt)) if receipt.succeeded() => {
                tracing::info!(
                    component = %component,
                    block_number = receipt.block_number,
                    "Transaction mined"
                );
                Ok(receipt)
            }
            Ok(Ok(_)) => Err(BlockchainError::Rejected {
                tx_hash: tx_id.to_string(),
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash: tx_id.to_string(),
                secs: self.deadline.as_secs(),
            }),
        };

        let label = match &outcome {
            Ok(_) => "mined",
            Err(BlockchainError::Rejected { .. }) => "rejected",
            Err(BlockchainError::ConfirmationTimeout { .. }) => "timeout",
            Err(_) => "error",
        };
        metrics::record_confirmation_wait(label, started);

        if let Err(e) = &outcome {
            tracing::error!(
                component = %component,
                tx_id = %tx_id,
                error = %e,
                "Transaction not confirmed"
            );
        }
        outcome
    }

    async fn poll(&self, tx_id: &str, component: &str) -> BlockchainResult<Receipt> {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.source.receipt(tx_id).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => {
                    tracing::debug!(component = %component, tx_id = %tx_id, "Transaction pending");
                }
                Err(e @ BlockchainError::InvalidTxHash(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        component = %component,
                        tx_id = %tx_id,
                        error = %e,
                        "Receipt poll failed"
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for ConfirmationWaiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationWaiter")
            .field("links", &self.links)
            .field("poll_interval", &self.poll_interval)
            .field("deadline", &self.deadline)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Receipt source that reports "pending" a fixed number of times.
    pub(crate) struct ScriptedReceipts {
        pending_polls: u32,
        receipt: Receipt,
        pub(crate) calls: AtomicU32,
    }

    impl ScriptedReceipts {
        pub(crate) fn new(pending_polls: u32, receipt: Receipt) -> Self {
            Self {
                pending_polls,
                receipt,
                calls: AtomicU32::new(0),
            }
        }

        pub(crate) fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReceiptSource for ScriptedReceipts {
        async fn receipt(&self, _tx_id: &str) -> BlockchainResult<Option<Receipt>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.pending_polls {
                Ok(None)
            } else {
                Ok(Some(self.receipt))
            }
        }
    }

    pub(crate) fn waiter(source: Arc<dyn ReceiptSource>) -> ConfirmationWaiter {
        ConfirmationWaiter::new(
            source,
            ExplorerLinks::new("ropsten"),
            Duration::from_millis(100),
            Duration::from_secs(5),
        )
    }
}
