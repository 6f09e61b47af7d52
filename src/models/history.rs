use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EnrichedFilm;

/// A persisted recommendation in a user's history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub title: String,
    pub description: String,
    pub cast: Vec<String>,
    pub duration: String,
    pub year: i32,
    pub poster_url: String,
    pub created_at: DateTime<Utc>,
}

/// The backend's year text could not be read as a number
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot read a year from {raw:?} for {title:?}")]
pub struct YearCoercionError {
    pub title: String,
    pub raw: String,
}

/// Reads the leading integer of a free-text year: "2004-2006" is 2004
pub fn coerce_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    let digits: &str = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };
    digits.parse().ok()
}

impl TryFrom<&EnrichedFilm> for HistoryEntry {
    type Error = YearCoercionError;

    fn try_from(enriched: &EnrichedFilm) -> Result<Self, Self::Error> {
        let film = &enriched.film;
        let year = coerce_year(&film.year).ok_or_else(|| YearCoercionError {
            title: film.title.clone(),
            raw: film.year.clone(),
        })?;

        Ok(HistoryEntry {
            title: film.title.clone(),
            description: film.description.clone(),
            cast: film.cast.clone(),
            duration: film.duration.clone(),
            year,
            poster_url: enriched.poster_url.clone(),
            created_at: Utc::now(),
        })
    }
}
