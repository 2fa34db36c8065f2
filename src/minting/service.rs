//! Bulk mint orchestration.
//!
//! ```text
//! Idle → ValidatingCount → RegisteringMinter → [WaitingConfirmation →]
//!      BuildingBatch → Minting → Responded | Failed
//! ```
//!
//! The count check runs before anything leaves the process. Registration of
//! the minter only waits for a receipt when a transaction was submitted.

use alloy::primitives::Address;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::blockchain::{BlockchainError, ConfirmationWaiter};
use crate::config::MintConfig;
use crate::imx::types::ether_key;
use crate::imx::{LazyLayer2, Layer2Error};
use crate::minting::batch::{build_mint_request, build_tokens, check_count};
use crate::observability::metrics;

const COMPONENT: &str = "[imx-bulk-mint]";

/// Errors of the bulk mint flow.
#[derive(Debug, Error)]
pub enum MintError {
    #[error("tried to mint too many tokens. Maximum {max}")]
    TooManyTokens { requested: u64, max: u64 },

    #[error("token ids starting at {base_id} overflow for {count} tokens")]
    TokenIdOverflow { base_id: u64, count: u64 },

    #[error("minter client unavailable: {0}")]
    Client(#[source] Layer2Error),

    #[error("minter registration failed: {0}")]
    Registration(#[source] Layer2Error),

    #[error("minter registration not confirmed: {0}")]
    Confirmation(#[source] BlockchainError),

    #[error("mint failed: {0}")]
    Mint(#[source] Layer2Error),
}

/// Where a bulk mint currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStage {
    ValidatingCount,
    RegisteringMinter,
    WaitingConfirmation,
    BuildingBatch,
    Minting,
}

impl MintStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidatingCount => "validating_count",
            Self::RegisteringMinter => "registering_minter",
            Self::WaitingConfirmation => "waiting_confirmation",
            Self::BuildingBatch => "building_batch",
            Self::Minting => "minting",
        }
    }
}

impl fmt::Display for MintStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enter(stage: MintStage) {
    tracing::Span::current().record("stage", stage.as_str());
}

/// Mints batches of sequentially numbered tokens with the owner identity.
#[derive(Debug, Clone)]
pub struct MintService {
    minter: Arc<LazyLayer2>,
    waiter: ConfirmationWaiter,
    config: MintConfig,
}

impl MintService {
    pub fn new(minter: Arc<LazyLayer2>, waiter: ConfirmationWaiter, config: MintConfig) -> Self {
        Self {
            minter,
            waiter,
            config,
        }
    }

    pub fn config(&self) -> &MintConfig {
        &self.config
    }

    /// Mint `count` tokens to `recipient` and return the platform's answer.
    #[tracing::instrument(
        name = "bulk_mint",
        skip(self),
        fields(component = COMPONENT, stage = tracing::field::Empty)
    )]
    pub async fn bulk_mint(
        &self,
        recipient: Address,
        count: u64,
    ) -> Result<serde_json::Value, MintError> {
        enter(MintStage::ValidatingCount);
        check_count(count, self.config.bulk_mint_max)?;

        let minter = self.minter.get().await.map_err(MintError::Client)?;

        enter(MintStage::RegisteringMinter);
        tracing::info!("Minter registration");
        let registration = minter
            .register_imx(minter.address(), minter.stark_public_key())
            .await
            .map_err(|e| {
                metrics::record_registration("failed");
                MintError::Registration(e)
            })?;

        if registration.needs_confirmation() {
            metrics::record_registration("submitted");
            enter(MintStage::WaitingConfirmation);
            tracing::info!("Waiting for minter registration...");
            self.waiter
                .wait_for_transaction(&registration.tx_hash, COMPONENT)
                .await
                .map_err(MintError::Confirmation)?;
        } else {
            metrics::record_registration("already_registered");
            tracing::info!(
                minter = %ether_key(minter.address()),
                "Minter registered, continuing..."
            );
        }

        enter(MintStage::BuildingBatch);
        tracing::info!("Off-chain mint of {} NFTs", count);
        let tokens = build_tokens(self.config.base_token_id, count, &self.config.blueprint)?;
        let request = build_mint_request(&self.config.token_address, recipient, tokens);

        enter(MintStage::Minting);
        match minter.mint_v2(std::slice::from_ref(&request)).await {
            Ok(result) => {
                metrics::record_tokens_minted(count);
                tracing::info!(recipient = %ether_key(recipient), "Minting success");
                Ok(result)
            }
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Mint request failed");
                Err(MintError::Mint(e))
            }
        }
    }
}
