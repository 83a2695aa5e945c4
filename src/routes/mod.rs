//! HTTP routes for Casegate

pub mod admin_users;
pub mod auth_routes;
pub mod health;

pub use admin_users::handle_create_user;
pub use auth_routes::handle_auth_request;
pub use health::health_check;
