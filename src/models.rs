use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::gatekeeper::Role;

// --- Core Application Schemas (Mapped to Database) ---

/// Profile
///
/// The user's canonical identity record stored in the `public.profiles` table.
/// The `role` field is kept as the raw column value here; parsing into the
/// `Role` enum (including the Unknown fallback) happens at the gatekeeper
/// boundary so an unrecognized value survives round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Profile {
    // Primary Key, also the Foreign Key to the external auth.users table.
    pub id: Uuid,
    pub email: String,
    // The RBAC field: 'admin', 'tenant' or 'service_provider'.
    pub role: String,
}

/// --- Request Payloads (Input Schemas) ---

/// SignUpRequest
///
/// Input payload for the public registration endpoint (POST /auth/sign-up).
/// Note: the password is only passed through to the external Auth provider
/// (Supabase) and never persisted or logged by this application.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// LoginRequest
///
/// Input payload for the password sign-in endpoint (POST /auth/login).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// --- Auth Flow Responses (Output Schemas) ---

/// SignUpResponse
///
/// Output of a successful registration: the canonical user ID issued by the
/// external Auth provider plus the landing path computed from the shared
/// role→dashboard table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignUpResponse {
    pub user_id: Uuid,
    pub redirect_to: String,
}

/// LoginResponse
///
/// Output of a successful sign-in. `redirect_to` is the single source of
/// truth for where the client should navigate next — the client must not
/// re-derive it from the role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub redirect_to: String,
}

/// SignOutResponse
///
/// Output of sign-out: where the client should land afterwards (always the
/// public landing page).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignOutResponse {
    pub redirect_to: String,
}

/// --- Dashboard & Profile Schemas (Output) ---

/// DashboardTarget
///
/// Output of the generic dashboard resolver and of onboarding completion:
/// the path the client should navigate to.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DashboardTarget {
    pub redirect_to: String,
}

/// ProfileIncompleteResponse
///
/// Terminal error payload for a fully authenticated account with no role row.
/// Deliberately not a redirect: guessing a dashboard for an unprovisioned
/// account is a data-integrity failure, not a routing decision. `sign_out`
/// carries the recovery action so a stuck account is not a dead end.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ProfileIncompleteResponse {
    pub error: String,
    pub sign_out: String,
}

/// OnboardingStatus
///
/// Output schema for the onboarding page (GET /onboarding): whether the
/// authenticated tenant has already recorded completion.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct OnboardingStatus {
    pub completed: bool,
}

/// UserProfile
///
/// Output schema for the authenticated user's profile (GET /me). The role is
/// surfaced already parsed; `onboarding_completed` is only populated for
/// tenants.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
}

/// DashboardPage
///
/// Minimal landing payload for the role-scoped dashboard endpoints. The real
/// dashboard content (tickets, documents, payments) is served by dedicated
/// APIs outside this crate's scope; these endpoints exist so every zone the
/// gatekeeper protects is a routable surface.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DashboardPage {
    pub area: String,
    pub user_id: Uuid,
}
