//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::BlogService;
use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_core::services::Repositories;
use blogicum_infra::{Argon2PasswordService, InMemoryBlogStore, JwtTokenService};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use blogicum_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository, connect,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub passwords: Arc<dyn PasswordService>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            blog: BlogService::new(repos),
            passwords,
            tokens,
        }
    }

    /// Build the state with PostgreSQL when configured and reachable,
    /// falling back to the in-memory store otherwise.
    pub async fn from_config(config: &AppConfig) -> Self {
        let repos = repositories(config).await;

        tracing::info!("Application state initialized");

        Self::new(
            repos,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
        )
    }
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> Repositories {
    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory(Arc::new(InMemoryBlogStore::new()));
    };

    match connect(db_config).await {
        Ok(db) => Repositories {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            locations: Arc::new(PostgresLocationRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db)),
        },
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory(Arc::new(InMemoryBlogStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_config: &AppConfig) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory store");
    in_memory(Arc::new(InMemoryBlogStore::new()))
}

/// Every repository served by the same in-memory store.
pub fn in_memory(store: Arc<InMemoryBlogStore>) -> Repositories {
    Repositories {
        users: store.clone(),
        categories: store.clone(),
        locations: store.clone(),
        posts: store.clone(),
        comments: store,
    }
}
