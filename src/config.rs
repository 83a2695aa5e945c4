//! Configuration for Casegate
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

/// Casegate - authentication gateway for the case management service
#[derive(Parser, Debug, Clone)]
#[command(name = "casegate")]
#[command(about = "Authentication gateway for the case management service")]
pub struct Args {
    /// Unique node identifier for this gateway instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Enable development mode (in-memory store fallback, dev JWT secret)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "casegate")]
    pub mongodb_db: String,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "1800")]
    pub jwt_expiry_seconds: u64,

    /// Username seeded into the in-memory store in dev mode
    #[arg(long, env = "DEV_ADMIN_USERNAME", default_value = "admin")]
    pub dev_admin_username: String,

    /// Email for the seeded dev admin account
    #[arg(long, env = "DEV_ADMIN_EMAIL", default_value = "admin@localhost")]
    pub dev_admin_email: String,

    /// Password for the seeded dev admin account
    #[arg(long, env = "DEV_ADMIN_PASSWORD", default_value = "admin")]
    pub dev_admin_password: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Get effective JWT secret (uses default in dev mode)
    pub fn jwt_secret(&self) -> String {
        if self.dev_mode {
            self.jwt_secret
                .clone()
                .unwrap_or_else(|| "dev-only-insecure-secret-do-not-deploy".to_string())
        } else {
            self.jwt_secret
                .clone()
                .expect("JWT_SECRET is required in production mode")
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode && self.jwt_secret.is_none() {
            return Err("JWT_SECRET is required in production mode".to_string());
        }

        if self.jwt_expiry_seconds == 0 {
            return Err("JWT_EXPIRY_SECONDS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["casegate"])
    }

    #[test]
    fn test_production_requires_secret() {
        let args = base_args();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_dev_mode_secret_fallback() {
        let mut args = base_args();
        args.dev_mode = true;
        assert!(args.validate().is_ok());
        assert!(args.jwt_secret().len() >= 32);
    }

    #[test]
    fn test_zero_expiry_rejected() {
        let mut args = base_args();
        args.dev_mode = true;
        args.jwt_expiry_seconds = 0;
        assert!(args.validate().is_err());
    }
}
