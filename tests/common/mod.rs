#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use moodreel_api::{
    api::{create_router, AppState},
    db::InMemoryHistoryRepository,
    error::{AppError, AppResult},
    models::Poster,
    services::{
        providers::{GenerativeBackend, PosterLookup},
        RecommendationPipeline,
    },
};

/// Backend that replays scripted replies in order and records every prompt
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<AppResult<String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn push_error(&self, error: AppError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Backend("no scripted reply".to_string())))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Poster lookup backed by a fixed table, with optional per-title latency
#[derive(Default)]
pub struct TablePosterLookup {
    posters: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    failing: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl TablePosterLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poster(mut self, title: &str, url: &str) -> Self {
        self.posters.insert(title.to_string(), url.to_string());
        self
    }

    pub fn with_delay(mut self, title: &str, delay: Duration) -> Self {
        self.delays.insert(title.to_string(), delay);
        self
    }

    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing = Some(title.to_string());
        self
    }
}

#[async_trait::async_trait]
impl PosterLookup for TablePosterLookup {
    async fn lookup(&self, title: &str) -> AppResult<Poster> {
        self.calls.lock().unwrap().push(title.to_string());

        if let Some(delay) = self.delays.get(title) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.as_deref() == Some(title) {
            return Err(AppError::Enrichment(format!("lookup failed for {}", title)));
        }

        Ok(match self.posters.get(title) {
            Some(url) => Poster::Found(url.clone()),
            None => Poster::NotFound,
        })
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

pub struct TestContext {
    pub backend: Arc<ScriptedBackend>,
    pub posters: Arc<TablePosterLookup>,
    pub history: Arc<InMemoryHistoryRepository>,
}

impl TestContext {
    pub fn new(posters: TablePosterLookup) -> Self {
        Self {
            backend: Arc::new(ScriptedBackend::new()),
            posters: Arc::new(posters),
            history: Arc::new(InMemoryHistoryRepository::new()),
        }
    }

    pub fn pipeline(&self) -> RecommendationPipeline {
        RecommendationPipeline::new(
            self.backend.clone(),
            self.posters.clone(),
            self.history.clone(),
        )
    }

    pub fn router(&self, timeout: Duration) -> axum::Router {
        create_router(AppState::new(self.pipeline(), timeout))
    }
}

/// A well-formed full reply naming the given titles
pub fn full_reply(mood: &str, titles: [&str; 4]) -> String {
    let films: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            serde_json::json!({
                "film": {
                    "title": title,
                    "description": format!("About {}", title),
                    "cast": "Actor One, Actor Two",
                    "duration": "100 minutes",
                    "year": format!("{}", 2000 + i),
                }
            })
        })
        .collect();

    let body = serde_json::json!({ "mood": mood, "films": films });
    format!("```json\n{}\n```", body)
}

pub fn topic_reply(titles: [&str; 4]) -> String {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| format!("Title{}: \"{}\"", i + 1, title))
        .collect::<Vec<_>>()
        .join("\n")
}
