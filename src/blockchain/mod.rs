//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration (private keys, Infura key or RPC URL)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (read-only RPC connection with timeouts)
//!     → registration.rs (registration contract calls)
//!     → confirmation.rs (poll for receipt, classify, deadline)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod confirmation;
pub mod registration;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use confirmation::{ConfirmationWaiter, ExplorerLinks, ReceiptSource};
pub use registration::RegistrationContract;
pub use types::{BlockchainError, BlockchainResult, ChainId, Receipt};
pub use wallet::Wallet;
