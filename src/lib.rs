//! ImmutableX minting service library.
//!
//! Exposes sign-in and bulk-mint flows over HTTP and waits for the
//! on-chain registration transaction before minting.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod imx;
pub mod lifecycle;
pub mod minting;
pub mod observability;
pub mod users;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
