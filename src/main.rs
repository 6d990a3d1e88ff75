use std::sync::Arc;

use domain::gateway::convex::ConvexClient;
use domain::{SignatureVerifier, SigningSecret};
use log::{error, info, warn};
use service::{config::Config, logging::Logger};
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!(
        "Starting booking platform backend [{}]...",
        config.runtime_env()
    );

    let user_store = match ConvexClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to initialize Convex client: {e}");
            std::process::exit(1);
        }
    };

    let verifier = build_verifier(&config);

    let app_state = AppState::new(config, user_store, verifier);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

/// Parse and validate the webhook signing secret once at startup.
///
/// A missing or invalid secret does not stop the process: the webhook
/// endpoint answers 500 until an operator fixes the configuration, while the
/// rest of the router stays up.
fn build_verifier(config: &Config) -> Option<Arc<SignatureVerifier>> {
    match config.clerk_webhook_signing_secret() {
        Some(raw) => match SigningSecret::from_provider_string(&raw) {
            Ok(secret) => Some(Arc::new(SignatureVerifier::new(secret))),
            Err(e) => {
                error!("CLERK_WEBHOOK_SIGNING_SECRET is invalid: {e}");
                None
            }
        },
        None => {
            warn!("CLERK_WEBHOOK_SIGNING_SECRET is not set; webhook deliveries will be rejected");
            None
        }
    }
}
