//! Casegate - authentication gateway for the case management service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use casegate::{
    auth::{password, Role, TokenSigner},
    config::Args,
    server,
    store::{MemoryStore, MongoStore, User, UserStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("casegate={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Casegate - Authentication Gateway");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!(
        "Mode: {}",
        if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" }
    );
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Token expiry: {}s", args.jwt_expiry_seconds);
    info!("======================================");

    // Signing secret is loaded once here; rotating it invalidates all
    // outstanding tokens
    let tokens = match TokenSigner::new(args.jwt_secret(), args.jwt_expiry_seconds) {
        Ok(t) => t,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // Connect to MongoDB, falling back to a seeded in-memory store in dev mode
    let store: Arc<dyn UserStore> = match MongoStore::connect(&args.mongodb_uri, &args.mongodb_db)
        .await
    {
        Ok(store) => {
            info!("MongoDB connected successfully");
            Arc::new(store)
        }
        Err(e) if args.dev_mode => {
            warn!("MongoDB connection failed (dev mode, using in-memory store): {}", e);
            Arc::new(seed_dev_store(&args).await?)
        }
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(server::AppState::new(args, store, tokens));

    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Build an in-memory store with one admin account so provisioning is
/// reachable in dev mode. Production expects admins to already exist in
/// the store.
async fn seed_dev_store(args: &Args) -> anyhow::Result<MemoryStore> {
    let store = MemoryStore::new();

    let admin = User {
        username: args.dev_admin_username.clone(),
        email: args.dev_admin_email.clone(),
        password_hash: password::hash(&args.dev_admin_password)
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        role: Role::Admin,
    };

    store
        .insert(&admin)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    info!("Seeded dev admin user '{}'", args.dev_admin_username);
    Ok(store)
}
