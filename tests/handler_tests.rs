use axum::{extract::State, http::StatusCode};
use housing_portal::{
    AppState,
    auth::{CurrentUser, MockSessionService},
    config::AppConfig,
    directory::MockDirectory,
    gatekeeper::Role,
    handlers,
    models::Profile,
};
use std::sync::Arc;
use uuid::Uuid;

// --- Test Utilities ---

const TEST_ID: Uuid = Uuid::from_u128(123);

fn test_state(directory: MockDirectory) -> AppState {
    AppState {
        sessions: Arc::new(MockSessionService::signed_in(TEST_ID)),
        directory: Arc::new(directory),
        config: AppConfig::default(),
    }
}

fn user(role: Role) -> CurrentUser {
    CurrentUser { id: TEST_ID, role }
}

// --- Onboarding Completion ---

#[tokio::test]
async fn test_complete_onboarding_records_and_redirects_tenant() {
    let state = test_state(MockDirectory::tenant(false));

    let result = handlers::complete_onboarding(user(Role::Tenant), State(state)).await;

    let target = result.expect("tenant completion should succeed").0;
    assert_eq!(target.redirect_to, "/tenant/dashboard");
}

#[tokio::test]
async fn test_complete_onboarding_forbidden_for_non_tenants() {
    for role in [Role::Admin, Role::ServiceProvider, Role::Unknown] {
        let state = test_state(MockDirectory::with_role("admin"));
        let result = handlers::complete_onboarding(user(role), State(state)).await;
        assert_eq!(result.unwrap_err(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_complete_onboarding_write_failure_is_server_error() {
    let state = test_state(MockDirectory {
        role: Some("tenant".to_string()),
        set_onboarding_result: false,
        ..MockDirectory::default()
    });

    let result = handlers::complete_onboarding(user(Role::Tenant), State(state)).await;
    assert_eq!(result.unwrap_err(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- Onboarding Status ---

#[tokio::test]
async fn test_onboarding_status_reflects_store_for_tenants() {
    let state = test_state(MockDirectory::tenant(true));
    let status = handlers::get_onboarding_status(user(Role::Tenant), State(state)).await;
    assert!(status.completed);

    let state = test_state(MockDirectory::tenant(false));
    let status = handlers::get_onboarding_status(user(Role::Tenant), State(state)).await;
    assert!(!status.completed);
}

#[tokio::test]
async fn test_onboarding_status_skips_store_for_non_tenants() {
    // The store says "completed", but a non-tenant must never consult it.
    let state = test_state(MockDirectory {
        role: Some("admin".to_string()),
        onboarding_completed: true,
        ..MockDirectory::default()
    });
    let status = handlers::get_onboarding_status(user(Role::Admin), State(state)).await;
    assert!(!status.completed);
}

// --- Profile Endpoint ---

#[tokio::test]
async fn test_get_me_populates_onboarding_flag_for_tenants_only() {
    let profile = Profile {
        id: TEST_ID,
        email: "resident@example.com".to_string(),
        role: "tenant".to_string(),
    };
    let state = test_state(MockDirectory {
        role: Some("tenant".to_string()),
        onboarding_completed: true,
        profile: Some(profile.clone()),
        ..MockDirectory::default()
    });

    let me = handlers::get_me(user(Role::Tenant), State(state))
        .await
        .expect("profile should resolve")
        .0;
    assert_eq!(me.id, TEST_ID);
    assert_eq!(me.email, "resident@example.com");
    assert_eq!(me.role, Role::Tenant);
    assert_eq!(me.onboarding_completed, Some(true));

    let admin_profile = Profile {
        id: TEST_ID,
        email: "ops@example.com".to_string(),
        role: "admin".to_string(),
    };
    let state = test_state(MockDirectory {
        role: Some("admin".to_string()),
        onboarding_completed: true,
        profile: Some(admin_profile),
        ..MockDirectory::default()
    });

    let me = handlers::get_me(user(Role::Admin), State(state))
        .await
        .expect("profile should resolve")
        .0;
    assert_eq!(me.role, Role::Admin);
    assert_eq!(me.onboarding_completed, None);
}

#[tokio::test]
async fn test_get_me_missing_profile_is_not_found() {
    let state = test_state(MockDirectory::default());
    let result = handlers::get_me(user(Role::Unknown), State(state)).await;
    assert_eq!(result.unwrap_err(), StatusCode::NOT_FOUND);
}

// --- Zone Landing Pages (handler-level role checks) ---

#[tokio::test]
async fn test_dashboard_handlers_enforce_role_as_second_layer() {
    let page = handlers::tenant_dashboard(user(Role::Tenant))
        .await
        .expect("tenant allowed")
        .0;
    assert_eq!(page.area, "tenant");
    assert_eq!(page.user_id, TEST_ID);

    let result = handlers::tenant_dashboard(user(Role::Admin)).await;
    assert_eq!(result.unwrap_err(), StatusCode::FORBIDDEN);

    let page = handlers::admin_dashboard(user(Role::Admin))
        .await
        .expect("admin allowed")
        .0;
    assert_eq!(page.area, "admin");

    let result = handlers::admin_dashboard(user(Role::ServiceProvider)).await;
    assert_eq!(result.unwrap_err(), StatusCode::FORBIDDEN);

    let page = handlers::service_provider_dashboard(user(Role::ServiceProvider))
        .await
        .expect("service provider allowed")
        .0;
    assert_eq!(page.area, "service_provider");

    let result = handlers::service_provider_dashboard(user(Role::Tenant)).await;
    assert_eq!(result.unwrap_err(), StatusCode::FORBIDDEN);
}

// --- Sign-Out ---

#[tokio::test]
async fn test_sign_out_without_token_still_lands_on_home() {
    // No Authorization header means nothing to revoke upstream; the client
    // still gets the landing page as its next destination.
    let state = test_state(MockDirectory::default());
    let response =
        handlers::sign_out(State(state), axum::http::HeaderMap::new()).await;
    assert_eq!(response.redirect_to, "/");
}
