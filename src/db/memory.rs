use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    db::HistoryRepository,
    error::{AppError, AppResult},
    models::HistoryEntry,
    services::history::{append_and_trim, MAX_HISTORY_LEN},
};

/// Process-local history store
///
/// Appends happen under the write lock, so concurrent recommendations for the
/// same user never lose each other's entries.
///
/// By default only registered users exist. With auto-registration every
/// authenticated caller is treated as a known user with an empty history.
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    users: RwLock<HashMap<String, Vec<HistoryEntry>>>,
    auto_register: bool,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_register() -> Self {
        Self {
            auto_register: true,
            ..Self::default()
        }
    }

    /// Creates an empty history for a user; existing history is kept
    pub async fn register_user(&self, user_id: &str) {
        self.users
            .write()
            .await
            .entry(user_id.to_string())
            .or_default();
    }

    fn history_mut<'a>(
        &self,
        users: &'a mut HashMap<String, Vec<HistoryEntry>>,
        user_id: &str,
    ) -> AppResult<&'a mut Vec<HistoryEntry>> {
        if self.auto_register {
            return Ok(users.entry(user_id.to_string()).or_default());
        }
        users
            .get_mut(user_id)
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }
}

#[async_trait::async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn load_history(&self, user_id: &str) -> AppResult<Vec<HistoryEntry>> {
        match self.users.read().await.get(user_id) {
            Some(history) => Ok(history.clone()),
            None if self.auto_register => Ok(Vec::new()),
            None => Err(AppError::UserNotFound(user_id.to_string())),
        }
    }

    async fn save_history(&self, user_id: &str, history: Vec<HistoryEntry>) -> AppResult<()> {
        let mut users = self.users.write().await;
        let stored = self.history_mut(&mut users, user_id)?;
        *stored = append_and_trim(Vec::new(), history);
        Ok(())
    }

    async fn append_history(
        &self,
        user_id: &str,
        entries: Vec<HistoryEntry>,
    ) -> AppResult<Vec<HistoryEntry>> {
        let mut users = self.users.write().await;
        let stored = self.history_mut(&mut users, user_id)?;

        let current = std::mem::take(stored);
        *stored = append_and_trim(current, entries);
        debug_assert!(stored.len() <= MAX_HISTORY_LEN);

        Ok(stored.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn entry(title: &str) -> HistoryEntry {
        HistoryEntry {
            title: title.to_string(),
            description: "desc".to_string(),
            cast: vec!["Someone".to_string()],
            duration: "90 minutes".to_string(),
            year: 2000,
            poster_url: "N/A".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let repo = InMemoryHistoryRepository::new();
        let result = repo.load_history("ghost").await;
        assert!(matches!(result, Err(AppError::UserNotFound(id)) if id == "ghost"));
        assert_err!(repo.append_history("ghost", vec![entry("a")]).await);
    }

    #[tokio::test]
    async fn test_append_and_load() {
        let repo = InMemoryHistoryRepository::new();
        repo.register_user("ada").await;

        let history = assert_ok!(repo.append_history("ada", vec![entry("a"), entry("b")]).await);
        assert_eq!(history.len(), 2);

        let loaded = assert_ok!(repo.load_history("ada").await);
        assert_eq!(loaded, history);
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let repo = InMemoryHistoryRepository::new();
        repo.register_user("ada").await;
        assert_ok!(repo.append_history("ada", vec![entry("a")]).await);
        repo.register_user("ada").await;
        assert_eq!(assert_ok!(repo.load_history("ada").await).len(), 1);
    }

    #[tokio::test]
    async fn test_save_history_caps_length() {
        let repo = InMemoryHistoryRepository::new();
        repo.register_user("ada").await;

        let many: Vec<HistoryEntry> = (0..25).map(|i| entry(&format!("e{}", i))).collect();
        assert_ok!(repo.save_history("ada", many).await);

        let loaded = assert_ok!(repo.load_history("ada").await);
        assert_eq!(loaded.len(), MAX_HISTORY_LEN);
        assert_eq!(loaded[0].title, "e5");
    }

    #[tokio::test]
    async fn test_auto_register_accepts_any_caller() {
        let repo = InMemoryHistoryRepository::with_auto_register();

        assert!(assert_ok!(repo.load_history("newcomer").await).is_empty());

        let history = assert_ok!(repo.append_history("newcomer", vec![entry("a")]).await);
        assert_eq!(history.len(), 1);
        assert_eq!(assert_ok!(repo.load_history("newcomer").await), history);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_lose_nothing() {
        let repo = Arc::new(InMemoryHistoryRepository::new());
        repo.register_user("ada").await;

        let mut tasks = Vec::new();
        for batch in 0..4 {
            let repo = Arc::clone(&repo);
            tasks.push(tokio::spawn(async move {
                let entries = (0..4).map(|i| entry(&format!("b{}-{}", batch, i))).collect();
                repo.append_history("ada", entries).await
            }));
        }
        for task in tasks {
            assert_ok!(task.await.unwrap());
        }

        let loaded = assert_ok!(repo.load_history("ada").await);
        assert_eq!(loaded.len(), 16);
    }
}
