use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Routes nested under `/admin`, exclusively for the 'admin' role. Cross-role
/// isolation is enforced by the gatekeeper before routing; the handler-level
/// role check backs it up.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/dashboard
        // The administrator landing page.
        .route("/dashboard", get(handlers::admin_dashboard))
}
