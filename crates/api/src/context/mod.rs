//! Application context - dependency injection container

use std::sync::Arc;

use skytrack_core::{
    AuthService, DocumentStore, EntityStore, IdentityProvider, PreferenceStore,
    PreferencesService, StoreSync,
};
use skytrack_domain::{AuthError, Config, Result, StorageBackend};
use skytrack_infra::{
    DbManager, InMemoryDocumentStore, InMemoryIdentityProvider, InMemoryPreferenceStore,
    JsonFilePreferenceStore, SqliteDocumentStore,
};
use tokio::sync::Mutex;

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Type alias for document store port trait object
type DynDocumentStore = dyn DocumentStore;

/// Type alias for identity provider port trait object
type DynIdentityProvider = dyn IdentityProvider;

/// Type alias for preference store port trait object
type DynPreferenceStore = dyn PreferenceStore;

/// Adapters plugged into the core services
pub struct Adapters {
    pub documents: Arc<DynDocumentStore>,
    pub identity: Arc<DynIdentityProvider>,
    pub preferences: Arc<DynPreferenceStore>,
    /// Present when `documents` is SQLite-backed
    pub db: Option<Arc<DbManager>>,
}

impl Adapters {
    /// Build the adapters selected by `config`.
    ///
    /// The SQLite backend opens the database and runs migrations.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut db = None;
        let documents: Arc<DynDocumentStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
            StorageBackend::Sqlite => {
                let manager =
                    Arc::new(DbManager::new(&config.storage.path, config.storage.pool_size)?);
                manager.run_migrations()?;
                db = Some(Arc::clone(&manager));
                Arc::new(SqliteDocumentStore::new(manager))
            }
        };

        let identity = InMemoryIdentityProvider::new();
        identity.set_ready(config.identity.ready);

        let preferences: Arc<DynPreferenceStore> = match &config.preferences_path {
            Some(path) => Arc::new(JsonFilePreferenceStore::new(path)),
            None => Arc::new(InMemoryPreferenceStore::new()),
        };

        Ok(Self { documents, identity: Arc::new(identity), preferences, db })
    }
}

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Option<Arc<DbManager>>,
    pub documents: Arc<DynDocumentStore>,
    pub identity: Arc<DynIdentityProvider>,
    pub auth: Arc<AuthService>,
    pub store: Arc<EntityStore>,
    pub preferences: Arc<PreferencesService>,

    // Forwards principal changes to `store` until shutdown
    sync: Mutex<StoreSync>,
}

impl AppContext {
    /// Create a context from `.env`, the environment and config files
    pub async fn new() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
            Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
        }

        let config = skytrack_infra::config::load()?;
        Self::new_with_config(config).await
    }

    /// Create a context with an explicit configuration
    ///
    /// Primarily for tests, which point the SQLite backend at a temp dir.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        let adapters = Adapters::from_config(&config)?;
        Self::new_with_adapters(config, adapters).await
    }

    /// Create a context around caller-provided adapters
    ///
    /// Startup restores any provider session, loads device preferences and
    /// starts forwarding principal changes to the entity store.
    pub async fn new_with_adapters(config: Config, adapters: Adapters) -> Result<Self> {
        let Adapters { documents, identity, preferences, db } = adapters;

        let auth = Arc::new(AuthService::new(Arc::clone(&identity), Arc::clone(&documents)));
        let store = Arc::new(
            EntityStore::new(Arc::clone(&documents))
                .with_search_limit(config.search.max_results_per_collection),
        );
        let preferences = Arc::new(PreferencesService::new(preferences));

        preferences.load().await?;

        match auth.restore_session().await {
            Ok(Some(principal)) => tracing::info!(uid = %principal.uid, "session restored"),
            Ok(None) => {}
            Err(err) if err.auth_kind() == Some(AuthError::NotReady) => {
                tracing::warn!("identity provider not ready; starting signed out");
            }
            Err(err) => return Err(err),
        }

        let mut sync = StoreSync::new(Arc::clone(&store), Arc::clone(&auth));
        sync.start().await?;

        tracing::info!(backend = %config.storage.backend, "SkyTrack context initialised");

        Ok(Self {
            config,
            db,
            documents,
            identity,
            auth,
            store,
            preferences,
            sync: Mutex::new(sync),
        })
    }

    /// Whether principal changes are still being forwarded to the store
    pub async fn is_syncing(&self) -> bool {
        self.sync.lock().await.is_running()
    }

    /// Check health of the application components
    ///
    /// Covers the database (SQLite backend only), the identity provider and
    /// the store sync task.
    pub async fn health_check(&self) -> HealthStatus {
        let mut components = Vec::with_capacity(3);

        if let Some(db) = &self.db {
            components.push(check_database_health(Arc::clone(db)).await);
        }

        components.push(if self.identity.is_ready() {
            ComponentHealth::healthy("identity")
        } else {
            ComponentHealth::unhealthy("identity", "provider not ready")
        });

        components.push(if self.is_syncing().await {
            ComponentHealth::healthy("store_sync")
        } else {
            ComponentHealth::unhealthy("store_sync", "not running")
        });

        HealthStatus::from_components(components)
    }

    /// Shutdown the application context gracefully
    ///
    /// Stops the store sync task. The signed-in session is left with the
    /// identity provider so the next start can restore it. Idempotent.
    pub async fn shutdown(&self) -> Result<()> {
        self.sync.lock().await.stop().await?;
        tracing::info!("SkyTrack context shut down");
        Ok(())
    }
}

/// Check database health by running a trivial query on the blocking pool
async fn check_database_health(db: Arc<DbManager>) -> ComponentHealth {
    match tokio::task::spawn_blocking(move || db.health_check()).await {
        Ok(Ok(())) => ComponentHealth::healthy("database"),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "database health check failed");
            ComponentHealth::unhealthy("database", format!("query failed: {e}"))
        }
        Err(e) => {
            tracing::error!(error = %e, "database health check task panicked");
            ComponentHealth::unhealthy("database", format!("task panic: {e}"))
        }
    }
}
