/// Recommendation pipeline
///
/// Each run walks the same stages in order and stops at the first failure:
///
/// `Start -> PromptBuilt -> BackendCalled -> Parsed -> Enriched -> (Persisted | Returned)`
///
/// Only the full path persists. A failed run returns nothing and leaves the
/// user's history as it was.
use std::{fmt::Display, sync::Arc};

use tracing::instrument;

use crate::{
    db::HistoryRepository,
    error::{AppError, AppResult},
    models::{HistoryEntry, RecommendationRequest, RecommendationResult, TopicResult},
    services::{
        enrichment::{enrich_films, enrich_topic},
        history::build_history_entries,
        parser::{parse_full_reply, parse_topic_reply},
        prompts::{build_full_prompt, build_topic_prompt},
        providers::{GenerativeBackend, PosterLookup},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    PromptBuilt,
    BackendCalled,
    Parsed,
    Enriched,
    Persisted,
    Returned,
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Start => "start",
            PipelineStage::PromptBuilt => "prompt_built",
            PipelineStage::BackendCalled => "backend_called",
            PipelineStage::Parsed => "parsed",
            PipelineStage::Enriched => "enriched",
            PipelineStage::Persisted => "persisted",
            PipelineStage::Returned => "returned",
        };
        f.write_str(name)
    }
}

/// Tracks where a run is, for logging transitions and failures
struct StageTracker {
    path: &'static str,
    stage: PipelineStage,
}

impl StageTracker {
    fn new(path: &'static str) -> Self {
        Self {
            path,
            stage: PipelineStage::Start,
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        tracing::debug!(path = self.path, from = %self.stage, to = %next, "Pipeline stage");
        self.stage = next;
    }

    fn fail(&self, error: AppError) -> AppError {
        tracing::error!(
            path = self.path,
            stage = %self.stage,
            kind = ?error.kind(),
            error = %error,
            "Pipeline run failed"
        );
        error
    }
}

/// Runs prompt building, generation, parsing, poster lookup and persistence
#[derive(Clone)]
pub struct RecommendationPipeline {
    backend: Arc<dyn GenerativeBackend>,
    posters: Arc<dyn PosterLookup>,
    history: Arc<dyn HistoryRepository>,
}

impl RecommendationPipeline {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        posters: Arc<dyn PosterLookup>,
        history: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            backend,
            posters,
            history,
        }
    }

    /// Recommends four titles for a free-text topic. Nothing is persisted.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn run_topic_query(&self, topic: &str) -> AppResult<TopicResult> {
        let mut tracker = StageTracker::new("topic");

        let prompt = build_topic_prompt(topic);
        tracker.advance(PipelineStage::PromptBuilt);

        let reply = self
            .backend
            .complete(&prompt)
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineStage::BackendCalled);

        let titles = parse_topic_reply(&reply).map_err(|e| tracker.fail(e.into()))?;
        tracker.advance(PipelineStage::Parsed);

        let result = enrich_topic(Arc::clone(&self.posters), titles.to_vec())
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineStage::Enriched);

        tracker.advance(PipelineStage::Returned);
        tracing::info!(titles = result.titles.len(), "Topic recommendation completed");

        Ok(result)
    }

    /// Recommends four films for a structured request and records them in the
    /// user's history
    #[instrument(skip(self, request), fields(backend = self.backend.name(), content_type = %request.content_type))]
    pub async fn run_full_recommendation(
        &self,
        request: &RecommendationRequest,
        user_id: &str,
    ) -> AppResult<RecommendationResult> {
        let mut tracker = StageTracker::new("full");

        let prompt = build_full_prompt(request);
        tracker.advance(PipelineStage::PromptBuilt);

        let reply = self
            .backend
            .complete(&prompt)
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineStage::BackendCalled);

        let parsed = parse_full_reply(&reply).map_err(|e| tracker.fail(e.into()))?;
        tracker.advance(PipelineStage::Parsed);

        let films = enrich_films(Arc::clone(&self.posters), parsed.films)
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineStage::Enriched);

        let entries = build_history_entries(&films);
        let skipped = films.len() - entries.len();
        let history = self
            .history
            .append_history(user_id, entries)
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineStage::Persisted);

        tracing::info!(
            mood = %parsed.mood,
            films = films.len(),
            skipped_entries = skipped,
            history_len = history.len(),
            store = self.history.name(),
            "Full recommendation completed"
        );

        Ok(RecommendationResult {
            mood: parsed.mood,
            films,
        })
    }

    /// Returns a user's recommendation history, oldest first
    #[instrument(skip(self))]
    pub async fn list_history(&self, user_id: &str) -> AppResult<Vec<HistoryEntry>> {
        self.history.load_history(user_id).await
    }
}
