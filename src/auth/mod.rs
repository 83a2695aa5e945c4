//! Authentication and authorization for Casegate
//!
//! Provides:
//! - Password hashing with Argon2
//! - JWT token issuance and validation
//! - Credential authentication and session resolution
//! - Role-based access control
//! - Admin-gated user provisioning

pub mod error;
pub mod password;
pub mod provision;
pub mod role;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use provision::{create_user, NewUserSpec, ProvisionError};
pub use role::{require_role, Role};
pub use service::{authenticate, login, resolve};
pub use token::{extract_bearer, Claims, TokenError, TokenSigner};
