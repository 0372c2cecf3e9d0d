use uuid::Uuid;

use crate::directory::DirectoryState;

use super::decision::Role;

/// DashboardResolution
///
/// Outcome of the generic post-login dashboard resolution (`GET /dashboard`).
/// This is the one codepath where a *missing* role row is distinguished from
/// an *unrecognized* role value: a fully authenticated account with no
/// `profiles` row is a provisioning failure, and silently guessing a
/// dashboard for it risks exposing the wrong one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardResolution {
    /// The caller has a role row; send them to the corresponding home path.
    /// An unrecognized role value still resolves here, to the generic
    /// `/dashboard` fallback.
    Redirect(String),
    /// No role row exists for the account. Terminal: the client must show the
    /// "profile incomplete — contact support" state and offer sign-out as the
    /// recovery path.
    ProfileIncomplete,
}

/// resolve_dashboard
///
/// Resolves the landing dashboard for an authenticated user via the role
/// directory. A directory failure is treated like a missing row: the caller
/// gets the terminal profile-incomplete state (with its sign-out recovery)
/// instead of a guessed dashboard.
pub async fn resolve_dashboard(directory: &DirectoryState, user_id: Uuid) -> DashboardResolution {
    match directory.role_value(user_id).await {
        Ok(Some(value)) => {
            let role = Role::parse(&value);
            DashboardResolution::Redirect(role.home_path().to_string())
        }
        Ok(None) => {
            tracing::warn!(%user_id, "authenticated account has no profile row");
            DashboardResolution::ProfileIncomplete
        }
        Err(e) => {
            tracing::error!(%user_id, error = %e, "role lookup failed during dashboard resolution");
            DashboardResolution::ProfileIncomplete
        }
    }
}
