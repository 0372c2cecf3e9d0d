/// Router Module Index
///
/// Organizes the application's routing logic into zone-segregated modules
/// that mirror the gatekeeper's path classification. The gatekeeper layer in
/// `create_router` is the enforcement point; this structure keeps each zone's
/// surface explicit so the route table and the classifier stay in sync.
///
/// Routes reachable without a session: landing page, health check, and the
/// auth flow (sign-up, login, sign-out).
pub mod public;

/// Session-gated routes outside any role zone: the generic dashboard
/// resolver and the profile endpoint.
pub mod authenticated;

/// The tenant onboarding gate: status page and the completion mutation.
pub mod onboarding;

/// Routes nested under `/tenant`, reachable only by onboarded tenants.
pub mod tenant;

/// Routes nested under `/admin`, reachable only by administrators.
pub mod admin;

/// Routes nested under `/service-provider`, reachable only by service
/// providers.
pub mod service_provider;
