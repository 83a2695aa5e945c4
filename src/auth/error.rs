//! Authentication error taxonomy
//!
//! `InvalidCredentials` and `Unauthenticated` carry deliberately generic
//! messages so callers cannot distinguish an unknown account from a bad
//! password or a stale token.

/// Errors produced by authentication and session resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Never distinguishes the two.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, or expired token, or the subject no longer exists.
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// Authenticated identity lacks the required role.
    #[error("Only admin users can perform this operation")]
    Forbidden,

    /// Store or signing backend failure unrelated to the caller's input.
    #[error("Authentication backend failure: {0}")]
    Backend(String),
}
