use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Service Provider Router Module
///
/// Routes nested under `/service-provider`, exclusively for the
/// 'service_provider' role.
pub fn service_provider_routes() -> Router<AppState> {
    Router::new()
        // GET /service-provider/dashboard
        // The service-provider landing page.
        .route("/dashboard", get(handlers::service_provider_dashboard))
}
