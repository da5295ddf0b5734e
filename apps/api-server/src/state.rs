//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    PasswordService, PostRepository, SystemClock, TokenService, UserRepository,
};
use quill_core::{PostAccessPolicy, PostService};
use quill_infra::database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};
use quill_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, PostgresUserRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, jwt: JwtConfig) -> Self {
        let (posts, users) = repositories(db_config).await;
        let state = Self::with_repositories(posts, users, jwt);

        tracing::info!("Application state initialized");
        state
    }

    /// State over fresh in-memory stores.
    #[cfg(test)]
    pub fn in_memory(jwt: JwtConfig) -> Self {
        let (posts, users) = in_memory_repositories();
        Self::with_repositories(posts, users, jwt)
    }

    fn with_repositories(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            posts: PostService::new(posts, Arc::new(SystemClock), PostAccessPolicy::new()),
            users,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn UserRepository>);

fn in_memory_repositories() -> Repositories {
    (
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    )
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories();
    };

    match quill_infra::database::connect(config).await {
        Ok(conn) => (
            Arc::new(PostgresPostRepository::new(conn.clone())),
            Arc::new(PostgresUserRepository::new(conn)),
        ),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory_repositories()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_db_config: Option<&DatabaseConfig>) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory_repositories()
}
