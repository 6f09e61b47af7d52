/// Upstream collaborators of the recommendation pipeline
///
/// The pipeline only sees these traits: a generative text backend that turns a
/// prompt into raw text, and a poster lookup that maps a title to artwork. Both
/// are fallible black boxes; concrete HTTP clients live in the submodules.
use crate::{error::AppResult, models::Poster};

pub mod omdb;
pub mod openai;

pub use omdb::OmdbPosterLookup;
pub use openai::OpenAiBackend;

/// Trait for generative text backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Sends one prompt and returns the model's raw reply text
    ///
    /// Transport failures and non-2xx responses are `AppError::Backend`.
    /// Nothing is retried here.
    async fn complete(&self, prompt: &str) -> AppResult<String>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Trait for poster artwork lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterLookup: Send + Sync {
    /// Looks up poster art for a title
    ///
    /// A title with no artwork is `Ok(Poster::NotFound)`, never an error.
    /// Only transport failures and non-2xx responses are `AppError::Enrichment`.
    async fn lookup(&self, title: &str) -> AppResult<Poster>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
