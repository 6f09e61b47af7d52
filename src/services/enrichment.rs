use std::sync::Arc;

use tokio::task::JoinSet;

use crate::{
    error::{AppError, AppResult},
    models::{EnrichedFilm, ParsedFilm, TopicResult, TopicTitle},
    services::providers::PosterLookup,
};

/// Looks up posters for all titles concurrently
///
/// Every lookup runs in its own task, so the batch costs about one round-trip.
/// Results come back in input order no matter which lookup finishes first.
/// A missing poster is folded into the sentinel URL; the first lookup that
/// fails aborts the rest and fails the whole batch. Dropping the returned
/// future aborts every lookup still in flight.
pub async fn enrich_titles(
    lookup: Arc<dyn PosterLookup>,
    titles: Vec<String>,
) -> AppResult<Vec<(String, String)>> {
    tracing::debug!(
        title_count = titles.len(),
        provider = lookup.name(),
        "Fetching posters"
    );

    let count = titles.len();
    let mut tasks = JoinSet::new();

    for (position, title) in titles.into_iter().enumerate() {
        let lookup = Arc::clone(&lookup);
        tasks.spawn(async move {
            let poster = lookup.lookup(&title).await;
            (position, title, poster)
        });
    }

    let mut slots: Vec<Option<(String, String)>> = vec![None; count];

    // Returning early drops the set, which aborts the remaining lookups
    while let Some(joined) = tasks.join_next().await {
        let (position, title, poster) =
            joined.map_err(|e| AppError::Internal(format!("Poster task failed: {}", e)))?;

        match poster {
            Ok(poster) => slots[position] = Some((title, poster.into_url())),
            Err(e) => {
                tracing::error!(title = %title, error = %e, "Poster lookup failed, dropping batch");
                return Err(e);
            }
        }
    }

    slots
        .into_iter()
        .map(|slot| slot.ok_or_else(|| AppError::Internal("Poster lookup produced no result".to_string())))
        .collect()
}

/// Attaches poster URLs to parsed films, keeping their order
pub async fn enrich_films(
    lookup: Arc<dyn PosterLookup>,
    films: Vec<ParsedFilm>,
) -> AppResult<Vec<EnrichedFilm>> {
    let titles = films.iter().map(|film| film.title.clone()).collect();
    let posters = enrich_titles(lookup, titles).await?;

    Ok(films
        .into_iter()
        .zip(posters)
        .map(|(film, (_, poster_url))| EnrichedFilm { film, poster_url })
        .collect())
}

/// Pairs topic titles with their poster URLs
pub async fn enrich_topic(
    lookup: Arc<dyn PosterLookup>,
    titles: Vec<String>,
) -> AppResult<TopicResult> {
    let posters = enrich_titles(lookup, titles).await?;

    Ok(TopicResult {
        titles: posters
            .into_iter()
            .map(|(title, poster_url)| TopicTitle { title, poster_url })
            .collect(),
    })
}
