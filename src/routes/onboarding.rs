use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Onboarding Router Module
///
/// The tenant onboarding gate's own surface. The gatekeeper routes incomplete
/// tenants *to* this zone and everyone else away from it; anonymous callers
/// are allowed through so the page can drive its own sign-in prompt.
pub fn onboarding_routes() -> Router<AppState> {
    Router::new()
        // GET /onboarding
        // Reports the authenticated tenant's completion status.
        .route("/onboarding", get(handlers::get_onboarding_status))
        // POST /onboarding/complete
        // Records completion for the tenant. This is the mutation the
        // gatekeeper's onboarding gate observes on the next navigation.
        .route("/onboarding/complete", post(handlers::complete_onboarding))
}
