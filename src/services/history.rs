use crate::models::{EnrichedFilm, HistoryEntry};

/// Most entries a user's history may hold
pub const MAX_HISTORY_LEN: usize = 20;

/// Appends new entries and drops the oldest until at most `MAX_HISTORY_LEN` remain
pub fn append_and_trim(
    mut history: Vec<HistoryEntry>,
    new_entries: Vec<HistoryEntry>,
) -> Vec<HistoryEntry> {
    history.extend(new_entries);
    if history.len() > MAX_HISTORY_LEN {
        let excess = history.len() - MAX_HISTORY_LEN;
        history.drain(..excess);
    }
    history
}

/// Turns enriched films into history entries
///
/// A film whose year can't be read as a number is left out with a warning; the
/// rest of the batch is kept.
pub fn build_history_entries(films: &[EnrichedFilm]) -> Vec<HistoryEntry> {
    films
        .iter()
        .filter_map(|film| match HistoryEntry::try_from(film) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(
                    title = %e.title,
                    year = %e.raw,
                    "Skipping history entry with unreadable year"
                );
                None
            }
        })
        .collect()
}
