/// Route Zone Classification
///
/// Every inbound path is classified into exactly one zone. The zones partition
/// the portal's URL space and are the sole path-derived input to the routing
/// decision: `Public` (landing page and the whole `/auth` flow), `Onboarding`
/// (the one-time tenant profile-completion step), the three role-scoped
/// dashboard areas, and `Other` for everything else.
///
/// Classification is a pure function of the path string. It is configuration,
/// not runtime state, and must stay in sync with the routers assembled in
/// `create_router`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteZone {
    /// `/` and `/auth/*`: reachable without a session.
    Public,
    /// `/onboarding*`: the tenant profile-completion gate.
    Onboarding,
    /// `/admin/*`: administrator dashboards.
    Admin,
    /// `/tenant/*`: tenant dashboards.
    Tenant,
    /// `/service-provider/*`: service-provider dashboards.
    ServiceProvider,
    /// Any path not covered above (e.g. `/dashboard`, `/settings`).
    Other,
}

impl RouteZone {
    /// classify
    ///
    /// Maps a request path to its zone. Prefix matches are segment-aware:
    /// `/tenant` and `/tenant/dashboard` are `Tenant`, but `/tenantx` is not.
    pub fn classify(path: &str) -> RouteZone {
        if path == "/" || in_zone(path, "/auth") {
            RouteZone::Public
        } else if in_zone(path, "/onboarding") {
            RouteZone::Onboarding
        } else if in_zone(path, "/admin") {
            RouteZone::Admin
        } else if in_zone(path, "/tenant") {
            RouteZone::Tenant
        } else if in_zone(path, "/service-provider") {
            RouteZone::ServiceProvider
        } else {
            RouteZone::Other
        }
    }
}

/// Segment-aware prefix test: the prefix must be followed by a path separator
/// (or end the path) to count as a zone match.
fn in_zone(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

// Static asset exclusions. These bypass the gatekeeper entirely (no session
// or role lookups), matching the hosting pipeline's path filter: media file
// extensions plus the framework-internal static/image optimization prefixes.
const ASSET_EXTENSIONS: &[&str] = &[
    // Video
    "mp4", "webm", "ogg", "avi", "mov", // Images
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico",
];

const ASSET_PREFIXES: &[&str] = &["/_next/static", "/_next/image"];

/// is_asset_path
///
/// Returns true when the path is a static asset that must be served without
/// any session, role, or onboarding evaluation.
pub fn is_asset_path(path: &str) -> bool {
    if ASSET_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }

    // Extension match on the final path segment, case-insensitive.
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .is_some_and(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ASSET_EXTENSIONS.contains(&ext.as_str())
        })
}
