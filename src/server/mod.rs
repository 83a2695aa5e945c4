//! HTTP server for Casegate

pub mod http;

pub use http::{run, AppState};
