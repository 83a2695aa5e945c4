//! Casegate - authentication gateway for the case management service
//!
//! Casegate verifies user credentials, issues and validates signed session
//! tokens, and enforces role-based access control on protected operations.
//!
//! ## Services
//!
//! - **Authentication**: credential verification and JWT issuance
//! - **Session resolution**: bearer token to authenticated identity
//! - **Access control**: role gating for protected operations
//! - **Provisioning**: admin-gated account creation

pub mod auth;
pub mod config;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{GatewayError, Result};
