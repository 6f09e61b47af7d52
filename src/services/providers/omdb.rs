/// OMDb poster lookup
///
/// OMDb answers title searches with HTTP 200 whether or not it knows the title;
/// the body says which. `{"Response":"False","Error":"Movie not found!"}` and a
/// `Poster` of "N/A" both mean no artwork. Bad keys and quota errors come back
/// as non-2xx and are real failures.
use crate::{
    error::{AppError, AppResult},
    models::{Poster, POSTER_NOT_FOUND},
    services::providers::PosterLookup,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;

#[derive(Clone)]
pub struct OmdbPosterLookup {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

/// The subset of an OMDb title response we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbTitleResponse {
    response: String,
    #[serde(default)]
    poster: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl OmdbPosterLookup {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn poster_from_response(response: OmdbTitleResponse) -> Poster {
        if !response.response.eq_ignore_ascii_case("true") {
            return Poster::NotFound;
        }

        match response.poster {
            Some(url) if !url.trim().is_empty() && url != POSTER_NOT_FOUND => Poster::Found(url),
            _ => Poster::NotFound,
        }
    }
}

#[async_trait::async_trait]
impl PosterLookup for OmdbPosterLookup {
    async fn lookup(&self, title: &str) -> AppResult<Poster> {
        let url = format!("{}/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Enrichment(format!("OMDb request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Enrichment(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let body: OmdbTitleResponse = response
            .json()
            .await
            .map_err(|e| AppError::Enrichment(format!("Failed to decode OMDb response: {}", e)))?;

        if let Some(reason) = &body.error {
            tracing::debug!(title = %title, reason = %reason, "OMDb has no match for title");
        }

        let poster = Self::poster_from_response(body);

        tracing::debug!(
            title = %title,
            found = matches!(poster, Poster::Found(_)),
            provider = "omdb",
            "Poster lookup completed"
        );

        Ok(poster)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
