//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction. Handlers get every
//! dependency from here; nothing is looked up globally.

use crate::auth::{JwtService, PasswordService};
use crate::config::AppConfig;
use crate::repositories::{
    MemoryStore, PgTodoRepository, PgUserRepository, TodoRepository, UserRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// Immutable after creation. Every field is an `Arc` or Arc-backed, so
/// cloning per request is O(1).
#[derive(Clone)]
pub struct AppState {
    users: Arc<dyn UserRepository>,
    todos: Arc<dyn TodoRepository>,
    config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    jwt: JwtService,
    passwords: PasswordService,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state backed by PostgreSQL
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self::with_repositories(
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgTodoRepository::new(db)),
            config,
        )
    }

    /// Create state backed by a fresh in-process store
    pub fn in_memory(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        Self::with_repositories(Arc::new(store.clone()), Arc::new(store), config)
    }

    /// Create state from explicit repositories
    ///
    /// This derives the JWT keys from the config secret; call it once at
    /// startup.
    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
        config: AppConfig,
    ) -> Self {
        let jwt = JwtService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.token_lifetime_secs,
            config.jwt.leeway_secs,
        );
        let passwords = PasswordService::new(&config.password);

        Self {
            users,
            todos,
            config: Arc::new(config),
            jwt,
            passwords,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    #[inline]
    pub fn todos(&self) -> &dyn TodoRepository {
        self.todos.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }

    #[inline]
    pub fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}
