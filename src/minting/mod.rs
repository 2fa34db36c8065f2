//! Bulk NFT minting.

pub mod batch;
pub mod service;

pub use batch::{build_mint_request, build_tokens, check_count};
pub use service::{MintError, MintService, MintStage};
