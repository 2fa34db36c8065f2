//! Layer-2 (ImmutableX) platform integration.
//!
//! # Data Flow
//! ```text
//! ImxClientParams (API URL, contracts, gas, private key, stark key)
//!     → LazyLayer2 (built on first use, shared afterwards)
//!     → ImxClient
//!         → REST API (users, signable registration, mints)
//!         → registration contract (isRegistered, registerUser)
//! ```

pub mod client;
pub mod error;
pub mod signing;
pub mod types;

pub use client::{ImxClient, ImxClientParams, LazyLayer2, Layer2, Layer2Handle};
pub use error::{Layer2Error, Layer2Result};
pub use types::{MintRequest, MintToken, MintUser, RegistrationResult, UserRecord};

#[cfg(test)]
pub(crate) mod testing;
