/// TMDB search provider
///
/// One search call per card against the movie or TV index; the first
/// result's poster, if present, becomes the card's single image.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::{MediaImageSource, ScreenKind},
};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    poster_path: Option<String>,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn poster_from(response: SearchResponse) -> Option<String> {
        response
            .results
            .first()
            .and_then(|r| r.poster_path.as_deref())
            .map(|path| format!("{}{}", POSTER_BASE_URL, path))
    }
}

#[async_trait::async_trait]
impl MediaImageSource for TmdbClient {
    async fn poster_url(&self, title: &str, kind: ScreenKind) -> AppResult<Option<String>> {
        let url = format!("{}/3/search/{}", self.api_url, kind.as_path());

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", title),
                ("include_adult", "false"),
                ("language", "en-US"),
                ("page", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response.json().await?;
        let poster = Self::poster_from(search);

        tracing::debug!(
            title = %title,
            found = poster.is_some(),
            provider = "tmdb",
            "Poster lookup completed"
        );

        Ok(poster)
    }
}
