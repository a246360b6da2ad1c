/// Unsplash search provider
///
/// The generic image fallback: one portrait-oriented search per card, first
/// hit wins, photographer name and profile link carried as attribution.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::{KeywordImage, KeywordImageSource},
};

#[derive(Clone)]
pub struct UnsplashClient {
    http_client: HttpClient,
    access_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    results: Vec<PhotoResult>,
}

#[derive(Debug, Deserialize)]
struct PhotoResult {
    urls: PhotoUrls,
    user: PhotoUser,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    #[serde(default)]
    name: Option<String>,
    links: UserLinks,
}

#[derive(Debug, Deserialize)]
struct UserLinks {
    #[serde(default)]
    html: Option<String>,
}

impl UnsplashClient {
    pub fn new(access_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            access_key,
            api_url,
        }
    }

    fn first_hit(response: PhotoSearchResponse) -> Option<KeywordImage> {
        response.results.into_iter().next().map(|r| KeywordImage {
            url: r.urls.regular,
            author: r.user.name,
            author_link: r.user.links.html,
        })
    }
}

#[async_trait::async_trait]
impl KeywordImageSource for UnsplashClient {
    async fn search_image(&self, keywords: &str) -> AppResult<Option<KeywordImage>> {
        let url = format!("{}/search/photos", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", keywords),
                ("per_page", "1"),
                ("orientation", "portrait"),
                ("client_id", self.access_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Unsplash API returned status {}: {}",
                status, body
            )));
        }

        let search: PhotoSearchResponse = response.json().await?;
        let hit = Self::first_hit(search);

        tracing::debug!(
            keywords = %keywords,
            found = hit.is_some(),
            provider = "unsplash",
            "Keyword image search completed"
        );

        Ok(hit)
    }
}
