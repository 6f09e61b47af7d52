use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    error::{AppError, AppResult},
    services::RecommendationPipeline,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RecommendationPipeline>,
    pub pipeline_timeout: Duration,
}

impl AppState {
    pub fn new(pipeline: RecommendationPipeline, pipeline_timeout: Duration) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            pipeline_timeout,
        }
    }

    /// Runs a pipeline future under the configured deadline
    ///
    /// On expiry the future is dropped. An uncommitted history transaction
    /// rolls back, and poster lookups still in flight are aborted.
    pub async fn with_deadline<T, F>(&self, future: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.pipeline_timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.pipeline_timeout.as_secs(),
                    "Pipeline deadline exceeded"
                );
                Err(AppError::Timeout(self.pipeline_timeout.as_secs()))
            }
        }
    }
}
