//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, trace, timeout, metrics)
//!     → handlers.rs (/, /signInUser, /mint)
//!     → users / minting services
//!     → error.rs (failures as JSON with a matching status)
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
