//! Layer-2 user registration.

pub mod service;

pub use service::{RegisterUserError, SignInOutcome, UserService};
