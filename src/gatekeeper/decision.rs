use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use super::zone::{RouteZone, is_asset_path};

// Canonical redirect targets. Every redirect the portal ever issues is built
// from these constants plus the role home table below; no call site carries
// its own copy.
pub const LOGIN_PATH: &str = "/auth/login";
pub const ONBOARDING_PATH: &str = "/onboarding";
pub const LANDING_PATH: &str = "/";
pub const GENERIC_DASHBOARD_PATH: &str = "/dashboard";

/// Role
///
/// The authorization category attached to an authenticated user via the
/// `profiles` table. A lookup miss or an unrecognized column value both
/// collapse to `Unknown`; the distinction between "no row" and "bad value"
/// only matters to the generic dashboard resolver (see `dashboard.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    Tenant,
    ServiceProvider,
    Unknown,
}

impl Role {
    /// Parses the raw `profiles.role` column value. Anything outside the three
    /// provisioned roles maps to `Unknown` rather than failing.
    pub fn parse(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            "tenant" => Role::Tenant,
            "service_provider" => Role::ServiceProvider,
            _ => Role::Unknown,
        }
    }

    /// Collapses a role lookup result (missing row included) to a `Role`.
    pub fn from_lookup(value: Option<&str>) -> Role {
        value.map(Role::parse).unwrap_or(Role::Unknown)
    }

    /// home_path
    ///
    /// The single role→dashboard table. Consumed by the gatekeeper's
    /// cross-role isolation rules, the login flow, and the generic dashboard
    /// resolver. `Unknown` lands on the generic `/dashboard` page.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Tenant => "/tenant/dashboard",
            Role::ServiceProvider => "/service-provider/dashboard",
            Role::Unknown => GENERIC_DASHBOARD_PATH,
        }
    }
}

/// Identity
///
/// The caller's resolved state for a single request: either anonymous, or
/// authenticated with a role and (for tenants) the onboarding-completion flag.
/// This is a frozen snapshot — the gatekeeper resolves it once per request and
/// never caches it across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated {
        role: Role,
        /// Only meaningful when `role == Role::Tenant`; resolved to `false`
        /// for every other role without consulting the store.
        onboarding_completed: bool,
    },
}

/// Decision
///
/// The gatekeeper's output for a request: pass it through, or send the client
/// somewhere else. There is no error variant — failure anywhere in identity
/// resolution degrades to the most restrictive branch instead of surfacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

impl Decision {
    fn redirect(target: impl Into<String>) -> Decision {
        Decision::Redirect(target.into())
    }
}

/// decide
///
/// The routing decision function. Pure and deterministic: the same
/// `(path, identity)` pair always yields the same decision, and evaluating it
/// has no side effects. Rules are evaluated in strict precedence order; the
/// first match wins.
///
/// 1. Static assets are always allowed.
/// 2. Anonymous callers may reach the public and onboarding zones; everything
///    else redirects to the login page.
/// 3. Tenants who have not completed onboarding are held out of the tenant
///    zone (redirected to `/onboarding`); tenants who have completed it are
///    bounced off the onboarding page to their dashboard.
/// 4. Non-tenant roles never see the onboarding page.
/// 5. Cross-role isolation: a role-scoped zone only admits its own role; any
///    other authenticated caller is sent to their own home path.
pub fn decide(path: &str, identity: &Identity) -> Decision {
    if is_asset_path(path) {
        return Decision::Allow;
    }

    let zone = RouteZone::classify(path);

    let (role, onboarding_completed) = match identity {
        Identity::Anonymous => {
            return match zone {
                RouteZone::Public | RouteZone::Onboarding => Decision::Allow,
                _ => Decision::redirect(LOGIN_PATH),
            };
        }
        Identity::Authenticated {
            role,
            onboarding_completed,
        } => (*role, *onboarding_completed),
    };

    if role == Role::Tenant {
        // Onboarding gate: incomplete tenants cannot enter the tenant zone.
        if !onboarding_completed && zone == RouteZone::Tenant {
            return Decision::redirect(ONBOARDING_PATH);
        }
        // Completed tenants have no business on the onboarding page.
        if onboarding_completed && zone == RouteZone::Onboarding {
            return Decision::redirect(Role::Tenant.home_path());
        }
    } else if zone == RouteZone::Onboarding {
        // Admins and service providers are sent home; an unknown role falls
        // back to the landing page rather than a dashboard it may not own.
        return match role {
            Role::Admin | Role::ServiceProvider => Decision::redirect(role.home_path()),
            _ => Decision::redirect(LANDING_PATH),
        };
    }

    // Cross-role isolation.
    match zone {
        RouteZone::Admin if role != Role::Admin => Decision::redirect(role.home_path()),
        RouteZone::Tenant if role != Role::Tenant => Decision::redirect(role.home_path()),
        RouteZone::ServiceProvider if role != Role::ServiceProvider => {
            Decision::redirect(role.home_path())
        }
        _ => Decision::Allow,
    }
}

/// post_login_target
///
/// Landing path handed to the client immediately after a successful sign-in
/// or sign-up. Shares the role home table with the gatekeeper; the tenant
/// branch additionally honors the onboarding gate so a fresh tenant lands on
/// `/onboarding` instead of a dashboard the middleware would bounce them from.
pub fn post_login_target(role: Role, onboarding_completed: bool) -> &'static str {
    match role {
        Role::Tenant if !onboarding_completed => ONBOARDING_PATH,
        role => role.home_path(),
    }
}
