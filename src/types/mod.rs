//! Shared types for Casegate

pub mod error;

pub use error::{GatewayError, Result};
