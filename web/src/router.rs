use crate::controller::{health_check_controller, webhook_controller};
use crate::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
    info(title = "Booking Platform API"),
    paths(
        health_check_controller::health_check,
        webhook_controller::clerk_webhook,
    ),
    components(schemas(webhook_controller::WebhookResponse)),
    tags(
        (name = "booking_platform", description = "Booking website backend API")
    )
)]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(webhook_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

/// Routes for external service webhooks (no session authentication - each
/// request is validated by its signature)
fn webhook_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/webhooks/clerk", post(webhook_controller::clerk_webhook))
        .with_state(app_state)
}

// This will serve static files that we can use as a "fallback" for when the server panics
pub fn static_routes() -> Router {
    Router::new().fallback_service(ServeDir::new("./"))
}
