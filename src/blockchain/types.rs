//! Chain-specific types and error definitions.

use serde::Serialize;
use thiserror::Error;

/// Chain id reported by the RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// No receipt showed up before the confirmation deadline.
    #[error("Transaction {tx_hash} not mined after {secs} seconds")]
    ConfirmationTimeout { tx_hash: String, secs: u64 },

    /// Transaction was mined with status 0.
    #[error("Transaction rejected")]
    Rejected { tx_hash: String },

    /// The identifier handed in is not a transaction hash.
    #[error("Invalid transaction hash '{0}'")]
    InvalidTxHash(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Contract call could not be built or sent.
    #[error("Contract call {function} failed: {reason}")]
    ContractCall { function: &'static str, reason: String },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Final record of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Receipt {
    /// `true` unless the transaction reverted.
    pub status: bool,
    /// Block the transaction was included in.
    pub block_number: u64,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status
    }
}
