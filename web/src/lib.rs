//! Web layer: axum router, controllers, and request-boundary error handling
//! for the booking platform backend.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use log::*;
use tower_http::cors::{AllowOrigin, CorsLayer};

use domain::user_sync::UserStore;
use domain::{ReplayGuard, SignatureVerifier};
use service::config::Config;

pub(crate) mod controller;
pub mod error;
pub mod router;

pub use error::Error;

/// Shared state for request handlers.
///
/// Everything here is read-only after startup: the verifier holds the signing
/// secret loaded once at process start, and the store client pools its own
/// connections. A `None` verifier means the signing secret is missing or
/// invalid; the webhook endpoint then answers 500 until an operator fixes the
/// configuration, while the rest of the router stays up.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_store: Arc<dyn UserStore>,
    pub verifier: Option<Arc<SignatureVerifier>>,
    pub replay_guard: ReplayGuard,
}

impl AppState {
    pub fn new(
        config: Config,
        user_store: Arc<dyn UserStore>,
        verifier: Option<Arc<SignatureVerifier>>,
    ) -> Self {
        let replay_guard = ReplayGuard::new(config.webhook_timestamp_tolerance_secs());
        Self {
            config,
            user_store,
            verifier,
            replay_guard,
        }
    }
}

/// Bind the configured interface and serve the router until shutdown.
pub async fn init_server(app_state: AppState) -> Result<(), std::io::Error> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let listen_addr = format!("{host}:{port}");

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_credentials(true)
        .allow_headers([CONTENT_TYPE]);

    info!("Server starting... listening for requests on http://{listen_addr}");

    let app = router::define_routes(app_state).layer(cors);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app).await
}
