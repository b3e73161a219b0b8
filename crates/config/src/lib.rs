//! Shared configuration for the tokengate workspace.
//!
//! This crate centralizes the constants and environment-driven settings used
//! by the client library, the simulated backend, and the test driver so the
//! three agree on ports, delays, and the expired-token sentinel.

pub mod constants;
pub mod loader;

pub use loader::{ConfigError, Settings, load_dotenv};
