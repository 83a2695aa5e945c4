//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::auth::TokenSigner;
use crate::config::Args;
use crate::routes;
use crate::routes::auth_routes::{error_response, BoxBody};
use crate::store::UserStore;
use crate::types::GatewayError;

/// Shared application state
///
/// The token signer and store are built once at startup and shared
/// read-only across all connections; requests carry no other state.
pub struct AppState {
    pub args: Args,
    pub store: Arc<dyn UserStore>,
    pub tokens: TokenSigner,
}

impl AppState {
    pub fn new(args: Args, store: Arc<dyn UserStore>, tokens: TokenSigner) -> Self {
        Self {
            args,
            store,
            tokens,
        }
    }
}

/// Run the HTTP server until the process is terminated
pub async fn run(state: Arc<AppState>) -> Result<(), GatewayError> {
    let listener = TcpListener::bind(state.args.listen).await?;
    info!("Listening on {}", state.args.listen);

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { Ok::<_, hyper::Error>(dispatch(req, state).await) }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Connection error from {}: {}", peer, err);
            }
        });
    }
}

async fn dispatch(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match routes::handle_auth_request(req, state).await {
        Some(response) => response,
        None => match (&method, path.as_str()) {
            (&Method::GET, "/health") => routes::health_check(),
            _ => error_response(StatusCode::NOT_FOUND, "Not found", "NOT_FOUND"),
        },
    };

    debug!("{} {} -> {}", method, path, response.status());
    response
}
