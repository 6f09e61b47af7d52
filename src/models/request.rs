use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// What the user asked for on the full-recommendation path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// e.g. "movie", "series", "cartoon"
    pub content_type: String,
    #[serde(alias = "genre1")]
    pub genre_primary: String,
    /// May equal `genre_primary`
    #[serde(alias = "genre2")]
    pub genre_secondary: String,
    /// Free-text mood description
    pub feeling: String,
    /// A title the user already likes
    pub movie_preference: String,
    /// Year or range of years, free text
    #[serde(alias = "years")]
    pub era: String,
    /// Advisory only
    pub platform: String,
}

impl RecommendationRequest {
    /// Rejects blank fields before the request reaches the pipeline
    pub fn validate(&self) -> AppResult<()> {
        let fields = [
            ("contentType", &self.content_type),
            ("genrePrimary", &self.genre_primary),
            ("genreSecondary", &self.genre_secondary),
            ("feeling", &self.feeling),
            ("moviePreference", &self.movie_preference),
            ("era", &self.era),
            ("platform", &self.platform),
        ];

        let blank: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Fields must not be empty: {}",
                blank.join(", ")
            )))
        }
    }
}

/// Validates the free-text topic of the topic path
pub fn validate_topic(topic: &str) -> AppResult<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("Topic cannot be empty".to_string()));
    }
    Ok(topic)
}
