pub mod memory;
pub mod postgres;

pub use memory::InMemoryHistoryRepository;
pub use postgres::{create_pool, run_migrations, PgHistoryRepository};

use std::sync::Arc;

use crate::{
    config::{Config, HistoryBackend},
    error::AppResult,
    models::HistoryEntry,
};

/// Storage for per-user recommendation history
///
/// Implementations own the user records; an unknown or deleted user is
/// `AppError::UserNotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Returns the user's history, oldest first
    async fn load_history(&self, user_id: &str) -> AppResult<Vec<HistoryEntry>>;

    /// Replaces the user's history with `history`
    async fn save_history(&self, user_id: &str, history: Vec<HistoryEntry>) -> AppResult<()>;

    /// Appends entries and trims the history to its cap, returning the result
    ///
    /// Must be atomic per user: two concurrent appends both land.
    async fn append_history(
        &self,
        user_id: &str,
        entries: Vec<HistoryEntry>,
    ) -> AppResult<Vec<HistoryEntry>>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Builds the history store selected by `HISTORY_BACKEND`
///
/// Postgres connects and applies migrations. The memory store registers
/// `MEMORY_USERS` and honours `MEMORY_AUTO_REGISTER`.
pub async fn build_history_repository(config: &Config) -> anyhow::Result<Arc<dyn HistoryRepository>> {
    match config.history_backend {
        HistoryBackend::Postgres => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            tracing::info!("Connected to Postgres, migrations applied");
            Ok(Arc::new(PgHistoryRepository::new(pool)))
        }
        HistoryBackend::Memory => {
            let repo = if config.memory_auto_register {
                InMemoryHistoryRepository::with_auto_register()
            } else {
                InMemoryHistoryRepository::new()
            };
            for user_id in config.memory_users.iter().filter(|id| !id.trim().is_empty()) {
                repo.register_user(user_id.trim()).await;
            }
            tracing::warn!(
                auto_register = config.memory_auto_register,
                seeded_users = config.memory_users.len(),
                "Using in-memory history; nothing survives a restart"
            );
            Ok(Arc::new(repo))
        }
    }
}
