use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Tenant Router Module
///
/// Routes nested under `/tenant`. The gatekeeper holds unonboarded tenants
/// out of this zone (redirecting them to `/onboarding`) and bounces every
/// other role to its own home path; the handlers still carry an explicit role
/// check as the second layer of defense.
pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        // GET /tenant/dashboard
        // The tenant landing page. Ticket, document and payment APIs hang off
        // this area and are served outside this crate.
        .route("/dashboard", get(handlers::tenant_dashboard))
}
