use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod directory;
pub mod gatekeeper;
pub mod handlers;
pub mod models;

// Module for routing segregation (one module per gatekeeper zone).
pub mod routes;
use routes::{admin, authenticated, onboarding, public, service_provider, tenant};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use auth::{JwtSessionService, MockSessionService, SessionState};
pub use config::AppConfig;
pub use directory::{DirectoryState, MockDirectory, PostgresDirectory};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the portal,
/// aggregating all paths and schemas decorated with the `#[utoipa::path]` and
/// `#[derive(utoipa::ToSchema)]` macros. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::sign_up, handlers::login, handlers::sign_out,
        handlers::get_dashboard, handlers::get_me,
        handlers::get_onboarding_status, handlers::complete_onboarding,
        handlers::tenant_dashboard, handlers::admin_dashboard,
        handlers::service_provider_dashboard,
    ),
    components(
        schemas(
            models::Profile, models::SignUpRequest, models::SignUpResponse,
            models::LoginRequest, models::LoginResponse, models::SignOutResponse,
            models::DashboardTarget, models::ProfileIncompleteResponse,
            models::OnboardingStatus, models::UserProfile, models::DashboardPage,
            gatekeeper::Role,
        )
    ),
    tags(
        (name = "housing-portal", description = "Housing Support Portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all essential
/// application services and configuration, shared across all incoming
/// requests. The session service and the profile directory are the
/// gatekeeper's two external collaborators; both are explicitly constructed
/// at startup and injected here — never module-level singletons.
#[derive(Clone)]
pub struct AppState {
    /// Session resolution: validates the caller's token, never errors.
    pub sessions: SessionState,
    /// Role/onboarding lookups against the managed Postgres.
    pub directory: DirectoryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow extractors and handlers to selectively pull
// components from the shared AppState.

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for DirectoryState {
    fn from_ref(app_state: &AppState) -> DirectoryState {
        app_state.directory.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies the
/// gatekeeper and observability layers, and registers the application state.
///
/// Layer order matters: the gatekeeper wraps every route *and* the fallback,
/// so an anonymous request for an unmatched path is redirected to login
/// rather than answered with a bare 404.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly — one merge/nest per gatekeeper zone.
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public zone: landing page, health, auth flow.
        .merge(public::public_routes())
        // Generic authenticated surface: /dashboard resolver and /me.
        .merge(authenticated::authenticated_routes())
        // Onboarding zone.
        .merge(onboarding::onboarding_routes())
        // Role zones, nested under their path prefixes.
        .nest("/tenant", tenant::tenant_routes())
        .nest("/admin", admin::admin_routes())
        .nest("/service-provider", service_provider::service_provider_routes())
        // Unmatched paths classify as zone `Other`; the gatekeeper decides
        // before this fallback is ever reached.
        .fallback(handlers::not_found)
        // The Session Gatekeeper: evaluates every navigation and either
        // forwards it or answers with a redirect.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gatekeeper::gatekeeper_middleware,
        ))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in
                // a span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns x-request-id to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation: extracts the
/// `x-request-id` header (if present) and includes it in the structured
/// logging metadata alongside the HTTP method and URI, so every log line for
/// a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
