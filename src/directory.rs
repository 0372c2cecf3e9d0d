use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Profile;

/// DirectoryError
///
/// Failure surface of the profile directory. The gatekeeper and the dashboard
/// resolver never let these escape a request — each call site collapses an
/// error to its conservative default (unknown role, incomplete onboarding) —
/// but keeping the error typed keeps that collapse visible and testable.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("profile directory query failed: {0}")]
    Query(#[from] sqlx::Error),
    /// Emitted by the mock implementation to simulate an outage.
    #[error("profile directory unavailable")]
    Unavailable,
}

/// ProfileDirectory
///
/// Abstract contract for the role/onboarding data that lives in the managed
/// Postgres behind the portal (`public.profiles` and `public.user_profiles`).
/// The gatekeeper consumes it read-only; the mutation methods serve the
/// external CRUD flows (sign-up creates the role row, the onboarding form
/// records completion) whose effects the gatekeeper merely observes.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn ProfileDirectory>`) safely shareable across Axum's asynchronous
/// task boundaries.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Raw value of `profiles.role` for the user. `Ok(None)` means no profile
    /// row exists — a distinction the dashboard resolver cares about.
    async fn role_value(&self, user_id: Uuid) -> Result<Option<String>, DirectoryError>;

    /// `user_profiles.onboarding_completed`. A missing row reads as `false`;
    /// only ever consulted for tenants.
    async fn onboarding_completed(&self, user_id: Uuid) -> Result<bool, DirectoryError>;

    /// Creates the mirroring profile record after external auth sign-up.
    async fn create_profile(&self, profile: Profile) -> Result<Profile, DirectoryError>;

    /// Records onboarding completion for a tenant. Returns true if a row was
    /// written.
    async fn set_onboarding_completed(&self, user_id: Uuid) -> Result<bool, DirectoryError>;

    /// Full profile record, for the authenticated profile endpoint.
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DirectoryError>;
}

/// The concrete type used to share directory access across the application state.
pub type DirectoryState = Arc<dyn ProfileDirectory>;

/// PostgresDirectory
///
/// The concrete implementation backed by the portal's Postgres instance.
/// Queries are runtime-bound (no compile-time schema coupling) since the
/// schema is owned by the hosted backend, not this crate.
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    /// Creates a new directory instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileDirectory for PostgresDirectory {
    async fn role_value(&self, user_id: Uuid) -> Result<Option<String>, DirectoryError> {
        let role = sqlx::query_scalar::<_, String>("SELECT role FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn onboarding_completed(&self, user_id: Uuid) -> Result<bool, DirectoryError> {
        let completed = sqlx::query_scalar::<_, bool>(
            "SELECT onboarding_completed FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        // No row yet means the tenant has not started onboarding.
        Ok(completed.unwrap_or(false))
    }

    async fn create_profile(&self, profile: Profile) -> Result<Profile, DirectoryError> {
        let created = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, email, role) VALUES ($1, $2, $3) RETURNING id, email, role",
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn set_onboarding_completed(&self, user_id: Uuid) -> Result<bool, DirectoryError> {
        // Upsert: the onboarding form may submit before any user_profiles row
        // exists for the tenant.
        let result = sqlx::query(
            "INSERT INTO user_profiles (user_id, onboarding_completed) VALUES ($1, true) \
             ON CONFLICT (user_id) DO UPDATE SET onboarding_completed = true",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DirectoryError> {
        let profile =
            sqlx::query_as::<_, Profile>("SELECT id, email, role FROM profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }
}

/// await_role
///
/// Bounded read-after-write poll for the role row. The directory may lag
/// external sign-up writes (the profile row is committed by a separate flow
/// than the auth account), so callers that need fresh role data immediately
/// after a mutation poll with a fixed number of attempts and a fixed backoff
/// instead of assuming the write is visible.
///
/// Returns the raw role value as soon as it becomes visible, or `None` once
/// the attempts are exhausted.
pub async fn await_role(
    directory: &DirectoryState,
    user_id: Uuid,
    attempts: u32,
    backoff: Duration,
) -> Option<String> {
    for attempt in 0..attempts {
        match directory.role_value(user_id).await {
            Ok(Some(value)) => return Some(value),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(%user_id, attempt, error = %e, "role poll attempt failed");
            }
        }
        if attempt + 1 < attempts {
            tokio::time::sleep(backoff).await;
        }
    }
    tracing::warn!(%user_id, attempts, "role row not visible after bounded poll");
    None
}

/// MockDirectory
///
/// A mock implementation of `ProfileDirectory` used for unit and integration
/// testing. Each lookup can independently be pinned to a value or forced to
/// fail, which is how the fail-open degradation paths are exercised without a
/// database. Role visibility can additionally be deferred (or made to fail)
/// for a leading number of lookups, which is how the read-after-write polling
/// paths are exercised.
#[derive(Clone)]
pub struct MockDirectory {
    /// The raw role value to return; `None` simulates a missing profile row.
    pub role: Option<String>,
    pub onboarding_completed: bool,
    /// When true, role lookups return a simulated failure.
    pub fail_role_lookup: bool,
    /// When true, onboarding lookups return a simulated failure.
    pub fail_onboarding_lookup: bool,
    pub profile: Option<Profile>,
    pub set_onboarding_result: bool,
    /// Number of leading role lookups that report no row before `role`
    /// becomes visible, simulating read-after-write lag.
    pub role_visible_after: u32,
    /// Number of leading role lookups that fail before the directory
    /// recovers, simulating a transient outage.
    pub fail_role_lookups_first: u32,
    /// Running count of role lookups, shared across clones so tests can
    /// assert how many attempts a poll actually made.
    pub role_lookups: Arc<AtomicU32>,
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self {
            role: None,
            onboarding_completed: false,
            fail_role_lookup: false,
            fail_onboarding_lookup: false,
            profile: None,
            set_onboarding_result: true,
            role_visible_after: 0,
            fail_role_lookups_first: 0,
            role_lookups: Arc::new(AtomicU32::new(0)),
        }
    }
}

impl MockDirectory {
    pub fn with_role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            ..Self::default()
        }
    }

    pub fn tenant(onboarding_completed: bool) -> Self {
        Self {
            role: Some("tenant".to_string()),
            onboarding_completed,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ProfileDirectory for MockDirectory {
    async fn role_value(&self, _user_id: Uuid) -> Result<Option<String>, DirectoryError> {
        let call = self.role_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_role_lookup || call < self.fail_role_lookups_first {
            return Err(DirectoryError::Unavailable);
        }
        if call < self.role_visible_after {
            return Ok(None);
        }
        Ok(self.role.clone())
    }

    async fn onboarding_completed(&self, _user_id: Uuid) -> Result<bool, DirectoryError> {
        if self.fail_onboarding_lookup {
            return Err(DirectoryError::Unavailable);
        }
        Ok(self.onboarding_completed)
    }

    async fn create_profile(&self, profile: Profile) -> Result<Profile, DirectoryError> {
        Ok(profile)
    }

    async fn set_onboarding_completed(&self, _user_id: Uuid) -> Result<bool, DirectoryError> {
        Ok(self.set_onboarding_result)
    }

    async fn get_profile(&self, _user_id: Uuid) -> Result<Option<Profile>, DirectoryError> {
        Ok(self.profile.clone())
    }
}
