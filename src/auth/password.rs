//! Password hashing and verification using Argon2
//!
//! Uses the argon2id variant with default parameters. Hashes are
//! self-describing PHC strings carrying the algorithm, parameters, and salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::types::GatewayError;

/// Hash a password using Argon2id
///
/// Returns the PHC-formatted hash string that includes the salt and
/// parameters. Two calls on the same password produce different strings.
pub fn hash(password: &str) -> Result<String, GatewayError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| GatewayError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
///
/// Malformed hash strings verify as false rather than raising an error.
pub fn verify(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
