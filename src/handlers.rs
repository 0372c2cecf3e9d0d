use crate::{
    AppState,
    auth::CurrentUser,
    directory::await_role,
    gatekeeper::{self, DashboardResolution, LANDING_PATH, Role, post_login_target},
    models::{
        DashboardPage, DashboardTarget, LoginRequest, LoginResponse, OnboardingStatus, Profile,
        ProfileIncompleteResponse, SignOutResponse, SignUpRequest, SignUpResponse, UserProfile,
    },
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

// Bounded poll parameters for role visibility after sign-up. The profile row
// is committed by a separate flow than the auth account, so a freshly
// registered user may not be visible to the directory immediately.
const ROLE_POLL_ATTEMPTS: u32 = 3;
const ROLE_POLL_BACKOFF: Duration = Duration::from_millis(500);

// --- External Auth Provider Payloads ---

/// SupabaseAuthResponse
///
/// Minimal struct to deserialize the response from the external Supabase
/// /auth/v1/signup endpoint, capturing the newly created user's UUID.
#[derive(Deserialize)]
struct SupabaseAuthResponse {
    id: Uuid,
}

/// SupabaseTokenResponse
///
/// Minimal struct for the password-grant response from /auth/v1/token.
#[derive(Deserialize)]
struct SupabaseTokenResponse {
    access_token: String,
    refresh_token: String,
    user: SupabaseTokenUser,
}

#[derive(Deserialize)]
struct SupabaseTokenUser {
    id: Uuid,
}

// --- Auth Flow Handlers ---

/// sign_up
///
/// [Public Route] Handles initial user registration via the external Supabase
/// Auth service.
///
/// *Flow*: Calls Supabase's signup endpoint, retrieves the `auth.users.id`
/// (UUID), and creates the corresponding record in the application's local
/// `public.profiles` table with the chosen role. This keeps the primary keys
/// synchronized between the external Auth system and our local schema.
///
/// *Eventual consistency*: The role row may lag the write; the landing path
/// is computed only after a bounded-attempt poll confirms (or gives up on)
/// its visibility — never by trusting the request payload alone.
#[utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Registered", body = SignUpResponse),
        (status = 400, description = "Rejected by auth provider")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<SignUpResponse>, StatusCode> {
    // Step 1: Call the external Auth provider (Supabase).
    let client = reqwest::Client::new();
    let auth_url = format!("{}/auth/v1/signup", state.config.supabase_url);

    let response = client
        .post(auth_url)
        .header("apikey", &state.config.supabase_anon_key)
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "email": payload.email, "password": payload.password }))
        .send()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !response.status().is_success() {
        // Supabase rejected the user (e.g., email already exists, weak password).
        return Err(StatusCode::BAD_REQUEST);
    }

    // Step 2: Extract the canonical user ID from the external response.
    let supabase_user = response
        .json::<SupabaseAuthResponse>()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Step 3: Create the mirrored profile row (`public.profiles`).
    let profile = Profile {
        id: supabase_user.id,
        email: payload.email,
        role: payload.role,
    };
    let created = state
        .directory
        .create_profile(profile)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "profile creation failed after external sign-up");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    // Step 4: Wait for the role row to become visible, then compute the
    // landing path from the shared role table. A new account has never
    // completed onboarding.
    let role_value = await_role(
        &state.directory,
        created.id,
        ROLE_POLL_ATTEMPTS,
        ROLE_POLL_BACKOFF,
    )
    .await;
    let role = Role::from_lookup(role_value.as_deref());

    Ok(Json(SignUpResponse {
        user_id: created.id,
        redirect_to: post_login_target(role, false).to_string(),
    }))
}

/// login
///
/// [Public Route] Password sign-in, proxied to the Supabase token endpoint.
///
/// The response carries `redirect_to`, computed from the single shared
/// role→dashboard table (including the tenant onboarding gate). Clients must
/// navigate to it verbatim rather than re-deriving the target from the role —
/// the server is the only owner of that mapping.
///
/// *Failure semantics*: A role lookup failure after a successful grant does
/// not fail the login; it degrades to the unknown-role landing (`/dashboard`),
/// never to a silently guessed role.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    let client = reqwest::Client::new();
    let token_url = format!(
        "{}/auth/v1/token?grant_type=password",
        state.config.supabase_url
    );

    let response = client
        .post(token_url)
        .header("apikey", &state.config.supabase_anon_key)
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "email": payload.email, "password": payload.password }))
        .send()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !response.status().is_success() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let grant = response
        .json::<SupabaseTokenResponse>()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Resolve role and (for tenants) the onboarding flag; lookup failures
    // collapse to the conservative defaults.
    let role = match state.directory.role_value(grant.user.id).await {
        Ok(value) => Role::from_lookup(value.as_deref()),
        Err(e) => {
            tracing::warn!(user_id = %grant.user.id, error = %e, "role lookup failed after login");
            Role::Unknown
        }
    };
    let onboarding_completed = if role == Role::Tenant {
        state
            .directory
            .onboarding_completed(grant.user.id)
            .await
            .unwrap_or(false)
    } else {
        false
    };

    Ok(Json(LoginResponse {
        access_token: grant.access_token,
        refresh_token: grant.refresh_token,
        redirect_to: post_login_target(role, onboarding_completed).to_string(),
    }))
}

/// sign_out
///
/// [Public Route] Revokes the caller's session at the external Auth provider
/// (best effort — a provider failure does not block sign-out from the
/// client's perspective) and hands back the public landing page as the next
/// destination. Also serves as the recovery action for the
/// profile-incomplete terminal state.
#[utoipa::path(
    post,
    path = "/auth/sign-out",
    responses((status = 200, description = "Signed out", body = SignOutResponse))
)]
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Json<SignOutResponse> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        let client = reqwest::Client::new();
        let logout_url = format!("{}/auth/v1/logout", state.config.supabase_url);
        let result = client
            .post(logout_url)
            .header("apikey", &state.config.supabase_anon_key)
            .bearer_auth(token)
            .send()
            .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "auth provider logout failed; session will expire on its own");
        }
    }

    Json(SignOutResponse {
        redirect_to: LANDING_PATH.to_string(),
    })
}

// --- Dashboard Resolution ---

/// get_dashboard
///
/// [Authenticated Route] The generic post-login landing resolver
/// (GET /dashboard). Shares the role→dashboard table with the gatekeeper.
///
/// This is the only codepath that distinguishes a *missing* role row from an
/// *unrecognized* role value: a missing row yields the terminal 409
/// profile-incomplete payload (with the sign-out recovery action) instead of
/// a redirect, while an unrecognized value still resolves to the generic
/// `/dashboard` fallback.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Resolved landing path", body = DashboardTarget),
        (status = 409, description = "Profile incomplete", body = ProfileIncompleteResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_dashboard(
    user: CurrentUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match gatekeeper::resolve_dashboard(&state.directory, user.id).await {
        DashboardResolution::Redirect(target) => (
            StatusCode::OK,
            Json(DashboardTarget {
                redirect_to: target,
            }),
        )
            .into_response(),
        DashboardResolution::ProfileIncomplete => (
            StatusCode::CONFLICT,
            Json(ProfileIncompleteResponse {
                error: "Your user profile is incomplete. Please contact support.".to_string(),
                sign_out: "/auth/sign-out".to_string(),
            }),
        )
            .into_response(),
    }
}

/// get_me
///
/// [Authenticated Route] Provides the authenticated user's profile
/// information. The onboarding flag is only populated for tenants; other
/// roles never consult the onboarding store.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "No profile row")
    )
)]
pub async fn get_me(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, StatusCode> {
    let profile = state
        .directory
        .get_profile(user.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let role = Role::parse(&profile.role);
    let onboarding_completed = if role == Role::Tenant {
        Some(
            state
                .directory
                .onboarding_completed(user.id)
                .await
                .unwrap_or(false),
        )
    } else {
        None
    };

    Ok(Json(UserProfile {
        id: profile.id,
        email: profile.email,
        role,
        onboarding_completed,
    }))
}

// --- Onboarding ---

/// get_onboarding_status
///
/// [Onboarding Route] Reports whether the authenticated tenant has completed
/// the one-time profile step. The gatekeeper already keeps non-tenants and
/// completed tenants away from this page; the flag is still resolved fresh
/// here rather than trusted from any earlier evaluation.
#[utoipa::path(
    get,
    path = "/onboarding",
    responses((status = 200, description = "Status", body = OnboardingStatus))
)]
pub async fn get_onboarding_status(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Json<OnboardingStatus> {
    let completed = if user.role == Role::Tenant {
        state
            .directory
            .onboarding_completed(user.id)
            .await
            .unwrap_or(false)
    } else {
        false
    };
    Json(OnboardingStatus { completed })
}

/// complete_onboarding
///
/// [Onboarding Route] Records onboarding completion for the authenticated
/// tenant. This is the external mutation the gatekeeper's onboarding gate
/// observes: once recorded, the next navigation to `/onboarding` bounces the
/// tenant to their dashboard.
///
/// *RBAC*: Only tenants have an onboarding state; any other role gets 403.
#[utoipa::path(
    post,
    path = "/onboarding/complete",
    responses(
        (status = 200, description = "Recorded", body = DashboardTarget),
        (status = 403, description = "Not a tenant")
    )
)]
pub async fn complete_onboarding(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardTarget>, StatusCode> {
    if user.role != Role::Tenant {
        return Err(StatusCode::FORBIDDEN);
    }

    let written = state
        .directory
        .set_onboarding_completed(user.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "failed to record onboarding completion");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !written {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(DashboardTarget {
        redirect_to: Role::Tenant.home_path().to_string(),
    }))
}

// --- Zone Landing Pages ---

/// tenant_dashboard
///
/// [Tenant Route] Landing payload for the tenant dashboard. The gatekeeper
/// enforces zone isolation before this runs; the explicit role check is the
/// second layer of defense.
#[utoipa::path(
    get,
    path = "/tenant/dashboard",
    responses(
        (status = 200, description = "Tenant dashboard", body = DashboardPage),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn tenant_dashboard(user: CurrentUser) -> Result<Json<DashboardPage>, StatusCode> {
    if user.role != Role::Tenant {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(DashboardPage {
        area: "tenant".to_string(),
        user_id: user.id,
    }))
}

/// admin_dashboard
///
/// [Admin Route] Landing payload for the admin dashboard.
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Admin dashboard", body = DashboardPage),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn admin_dashboard(user: CurrentUser) -> Result<Json<DashboardPage>, StatusCode> {
    if user.role != Role::Admin {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(DashboardPage {
        area: "admin".to_string(),
        user_id: user.id,
    }))
}

/// service_provider_dashboard
///
/// [Service Provider Route] Landing payload for the service-provider
/// dashboard.
#[utoipa::path(
    get,
    path = "/service-provider/dashboard",
    responses(
        (status = 200, description = "Service provider dashboard", body = DashboardPage),
        (status = 403, description = "Wrong role")
    )
)]
pub async fn service_provider_dashboard(
    user: CurrentUser,
) -> Result<Json<DashboardPage>, StatusCode> {
    if user.role != Role::ServiceProvider {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(DashboardPage {
        area: "service_provider".to_string(),
        user_id: user.id,
    }))
}

/// not_found
///
/// Fallback for unmatched paths. Reached only after the gatekeeper has
/// allowed the request (an anonymous caller hitting an unknown path is
/// redirected to login before routing happens).
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
