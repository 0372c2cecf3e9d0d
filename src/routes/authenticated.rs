use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Session-gated routes that do not belong to any role zone. `/dashboard` is
/// the generic post-login landing resolver (zone `Other` — the gatekeeper
/// redirects anonymous callers to login before routing reaches it), and `/me`
/// is the profile endpoint.
///
/// Access Control Strategy:
/// Every handler here takes the `CurrentUser` extractor, which re-resolves
/// the session and rejects with 401 when it is absent. The gatekeeper layer
/// above the router is the first line of defense; the extractor is the
/// second.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /dashboard
        // Resolves the caller's landing dashboard through the shared
        // role→path table. A missing role row yields the terminal 409
        // profile-incomplete payload instead of a redirect.
        .route("/dashboard", get(handlers::get_dashboard))
        // GET /me
        // The authenticated user's profile, with the onboarding flag
        // populated for tenants only.
        .route("/me", get(handlers::get_me))
}
