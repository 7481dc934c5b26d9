//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{InteractionRepository, PostRepository, RateLimiter};
use inkwell_core::retry::RetryPolicy;
use inkwell_core::services::{ListingService, PopularityService};
use inkwell_infra::{InMemoryInteractionRepository, InMemoryPostRepository};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use inkwell_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresInteractionRepository, PostgresPostRepository,
};

/// Which store backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

struct Stores {
    posts: Arc<dyn PostRepository>,
    interactions: Arc<dyn InteractionRepository>,
    backend: StorageBackend,
    #[cfg(feature = "postgres")]
    db: Option<Arc<DatabaseConnections>>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            interactions: Arc::new(InMemoryInteractionRepository::new()),
            backend: StorageBackend::Memory,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub popularity: PopularityService,
    pub listing: ListingService,
    pub storage: StorageBackend,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, falling back to in-memory stores when
    /// the database is not configured or unreachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let stores = Self::postgres_stores(config.database.as_ref()).await;

        #[cfg(not(feature = "postgres"))]
        let stores = {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL set but postgres feature disabled - ignoring");
            }
            tracing::info!("Running without postgres feature - using in-memory stores");
            Stores::in_memory()
        };

        let state = Self::from_stores(stores, config.retry);
        tracing::info!(storage = state.storage.as_str(), "Application state initialized");
        state
    }

    #[cfg(feature = "postgres")]
    async fn postgres_stores(db_config: Option<&DatabaseConfig>) -> Stores {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Stores::in_memory();
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                Stores {
                    posts: Arc::new(PostgresPostRepository::new(Arc::clone(&conn.main))),
                    interactions: Arc::new(PostgresInteractionRepository::new(Arc::clone(
                        &conn.main,
                    ))),
                    backend: StorageBackend::Postgres,
                    db: Some(conn),
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Stores::in_memory()
            }
        }
    }

    fn from_stores(stores: Stores, retry: RetryPolicy) -> Self {
        Self {
            popularity: PopularityService::new(stores.posts.clone(), stores.interactions)
                .with_retry(retry),
            listing: ListingService::new(stores.posts).with_retry(retry),
            storage: stores.backend,
            #[cfg(feature = "postgres")]
            db: stores.db,
        }
    }

    /// State over caller-provided stores.
    #[cfg(test)]
    pub fn with_repositories(
        posts: Arc<dyn PostRepository>,
        interactions: Arc<dyn InteractionRepository>,
    ) -> Self {
        Self::from_stores(
            Stores {
                posts,
                interactions,
                backend: StorageBackend::Memory,
                #[cfg(feature = "postgres")]
                db: None,
            },
            RetryPolicy::none(),
        )
    }

    /// Whether the backing store answers.
    pub async fn storage_reachable(&self) -> bool {
        #[cfg(feature = "postgres")]
        if let Some(db) = &self.db {
            return db.ping().await;
        }
        true
    }
}

/// Per-client limiter for the write routes, if rate limiting is compiled in.
pub fn rate_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    #[cfg(feature = "rate-limit")]
    {
        tracing::info!(
            max_requests = config.rate_limit.max_requests,
            window_secs = config.rate_limit.window.as_secs(),
            "Rate limiting enabled"
        );
        Some(Arc::new(inkwell_infra::rate_limit::InMemoryRateLimiter::new(
            config.rate_limit.clone(),
        )))
    }

    #[cfg(not(feature = "rate-limit"))]
    {
        let _ = config;
        None
    }
}
