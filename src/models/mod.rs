use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod history;
pub mod request;

pub use history::{HistoryEntry, YearCoercionError};
pub use request::RecommendationRequest;

/// Poster URL stored when OMDb has no artwork for a title
pub const POSTER_NOT_FOUND: &str = "N/A";

/// Number of items every recommendation reply must carry
pub const RECOMMENDATION_COUNT: usize = 4;

/// Mood tag attached to a full recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Busy,
    Melancholic,
    Energetic,
    Tired,
    Creative,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Busy,
        Mood::Melancholic,
        Mood::Energetic,
        Mood::Tired,
        Mood::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Busy => "Busy",
            Mood::Melancholic => "Melancholic",
            Mood::Energetic => "Energetic",
            Mood::Tired => "Tired",
            Mood::Creative => "Creative",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    /// Accepts the English names and the Italian ones older prompts asked for
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" | "felice" => Ok(Mood::Happy),
            "busy" | "impegnato" => Ok(Mood::Busy),
            "melancholic" | "malinconico" => Ok(Mood::Melancholic),
            "energetic" | "energico" => Ok(Mood::Energetic),
            "tired" | "stanco" => Ok(Mood::Tired),
            "creative" | "creativo" => Ok(Mood::Creative),
            _ => Err(s.to_string()),
        }
    }
}

/// A film as described by the generative backend, before poster lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFilm {
    pub title: String,
    pub description: String,
    /// Cast names in the order the model listed them
    pub cast: Vec<String>,
    /// Free text, e.g. "99 minutes"
    pub duration: String,
    /// Free text, coerced to an integer only when persisted
    pub year: String,
}

/// Typed reply of the full-recommendation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecommendation {
    pub mood: Mood,
    pub films: Vec<ParsedFilm>,
}

/// Outcome of a poster lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    Found(String),
    NotFound,
}

impl Poster {
    /// Folds "not found" into the sentinel URL
    pub fn into_url(self) -> String {
        match self {
            Poster::Found(url) => url,
            Poster::NotFound => POSTER_NOT_FOUND.to_string(),
        }
    }
}

/// A parsed film with its poster URL merged in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedFilm {
    #[serde(flatten)]
    pub film: ParsedFilm,
    pub poster_url: String,
}

/// Response of the full-recommendation path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationResult {
    pub mood: Mood,
    pub films: Vec<EnrichedFilm>,
}

/// A topic-path title paired with its poster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopicTitle {
    pub title: String,
    pub poster_url: String,
}

/// Response of the topic path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicResult {
    pub titles: Vec<TopicTitle>,
}
