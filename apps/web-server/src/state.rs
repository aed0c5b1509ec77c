//! Application state - shared across all handlers.

use std::sync::Arc;

use gazette_core::ports::{GroupRepository, PostRepository, UserRepository};
use gazette_infra::database::DatabaseConfig;
use gazette_infra::database::memory::{
    InMemoryGroupRepository, InMemoryPostRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use gazette_infra::database::{
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository, connect,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Build the application state with appropriate repository implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match connect(config).await {
                    Ok(conn) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self {
                            users: Arc::new(PostgresUserRepository::new(conn.clone())),
                            groups: Arc::new(PostgresGroupRepository::new(conn.clone())),
                            posts: Arc::new(PostgresPostRepository::new(conn)),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
        }

        Self::in_memory()
    }

    /// State backed entirely by the in-memory repositories.
    pub fn in_memory() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let groups = Arc::new(InMemoryGroupRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new(users.clone(), groups.clone()));

        Self {
            users,
            groups,
            posts,
        }
    }
}
