//! Session Gatekeeper
//!
//! The portal's single source of truth for navigation decisions. Every
//! inbound request is intercepted here, the caller's identity is resolved
//! fresh (session, then role, then onboarding, short-circuiting as soon as a
//! lookup becomes irrelevant), and exactly one of two outcomes is produced:
//! pass the request through, or redirect.
//!
//! The decision itself (`decision::decide`) is a pure function over the path
//! and a frozen identity snapshot; all I/O lives in `resolve_identity`. No
//! state is cached across requests, and no lookup failure ever escapes as an
//! error: uncertainty always degrades to the most restrictive branch
//! (anonymous, unknown role, onboarding incomplete).

pub mod dashboard;
pub mod decision;
pub mod zone;

pub use dashboard::{DashboardResolution, resolve_dashboard};
pub use decision::{
    Decision, GENERIC_DASHBOARD_PATH, Identity, LANDING_PATH, LOGIN_PATH, ONBOARDING_PATH, Role,
    decide, post_login_target,
};
pub use zone::{RouteZone, is_asset_path};

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, auth::SessionState, directory::DirectoryState};

/// resolve_identity
///
/// Builds the per-request identity snapshot consumed by `decide`.
///
/// Lookup order and short-circuiting:
/// 1. Session — absent (or failed) resolution means the caller is anonymous
///    and no further lookups run.
/// 2. Role — only for a present session. A directory error collapses to
///    `Role::Unknown` rather than propagating.
/// 3. Onboarding flag — only for role = tenant. Missing row or error
///    collapses to `false`.
pub async fn resolve_identity(
    sessions: &SessionState,
    directory: &DirectoryState,
    headers: &HeaderMap,
) -> Identity {
    let Some(session) = sessions.current_session(headers).await else {
        return Identity::Anonymous;
    };

    let role = match directory.role_value(session.user_id).await {
        Ok(value) => Role::from_lookup(value.as_deref()),
        Err(e) => {
            tracing::warn!(user_id = %session.user_id, error = %e, "role lookup failed; treating role as unknown");
            Role::Unknown
        }
    };

    // The onboarding store is only meaningful for tenants; everyone else
    // skips the lookup entirely.
    let onboarding_completed = if role == Role::Tenant {
        match directory.onboarding_completed(session.user_id).await {
            Ok(completed) => completed,
            Err(e) => {
                tracing::warn!(user_id = %session.user_id, error = %e, "onboarding lookup failed; treating as incomplete");
                false
            }
        }
    } else {
        false
    };

    Identity::Authenticated {
        role,
        onboarding_completed,
    }
}

/// gatekeeper_middleware
///
/// Axum middleware wrapping the whole router. Static assets bypass identity
/// resolution entirely; everything else is evaluated by the decision function
/// and either forwarded or answered with a temporary redirect. The middleware
/// reads external state but never mutates it.
pub async fn gatekeeper_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // Rule 1: asset exclusions skip all lookups, not just the decision.
    if is_asset_path(&path) {
        return next.run(request).await;
    }

    let identity = resolve_identity(&state.sessions, &state.directory, request.headers()).await;

    match decide(&path, &identity) {
        Decision::Allow => next.run(request).await,
        Decision::Redirect(target) => {
            tracing::debug!(%path, %target, "gatekeeper redirect");
            Redirect::temporary(&target).into_response()
        }
    }
}
