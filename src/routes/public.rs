use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client (anonymous or logged-in): the landing page, the health check, and
/// the auth flow. These paths all classify into the `Public` zone, so the
/// gatekeeper passes them through for anonymous callers.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // The marketing landing page surface. Content itself is served by the
        // frontend; this endpoint keeps the root path routable.
        .route("/", get(|| async { "housing-portal" }))
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/sign-up
        // New user creation: proxies the external Auth provider, mirrors the
        // profile row locally with the chosen role, and returns the landing
        // path once the role row is visible.
        .route("/auth/sign-up", post(handlers::sign_up))
        // POST /auth/login
        // Password sign-in via the external Auth provider. The response's
        // `redirect_to` is the only place the post-login destination is
        // computed.
        .route("/auth/login", post(handlers::login))
        // POST /auth/sign-out
        // Best-effort session revocation at the Auth provider; also the
        // recovery action for the profile-incomplete terminal state.
        .route("/auth/sign-out", post(handlers::sign_out))
}
