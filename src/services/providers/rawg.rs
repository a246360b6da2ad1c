/// RAWG games database provider
///
/// Two calls per video-game card: a title search resolving a numeric game
/// ID, then a detail fetch for that ID's single background image.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::GameImageSource,
};

#[derive(Clone)]
pub struct RawgClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct GameSearchResponse {
    #[serde(default)]
    results: Vec<GameResult>,
}

#[derive(Debug, Deserialize)]
struct GameResult {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct GameDetails {
    #[serde(default)]
    background_image: Option<String>,
}

impl RawgClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl GameImageSource for RawgClient {
    async fn resolve_game(&self, title: &str) -> AppResult<Option<u64>> {
        let url = format!("{}/api/games", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("search", title),
                ("page_size", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "RAWG API returned status {}: {}",
                status, body
            )));
        }

        let search: GameSearchResponse = response.json().await?;
        let game_id = search.results.first().map(|r| r.id);

        tracing::debug!(
            title = %title,
            resolved = game_id.is_some(),
            provider = "rawg",
            "Game ID lookup completed"
        );

        Ok(game_id)
    }

    async fn background_image(&self, game_id: u64) -> AppResult<Option<String>> {
        let url = format!("{}/api/games/{}", self.api_url, game_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "RAWG API returned status {}: {}",
                status, body
            )));
        }

        let details: GameDetails = response.json().await?;
        Ok(details.background_image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_search_deserialization() {
        let search: GameSearchResponse = serde_json::from_str(
            r#"{ "results": [ { "id": 41494, "name": "Hades", "slug": "hades" } ] }"#,
        )
        .unwrap();
        assert_eq!(search.results[0].id, 41494);
    }

    #[test]
    fn test_game_search_empty_is_valid() {
        let search: GameSearchResponse = serde_json::from_str(r#"{ "results": [] }"#).unwrap();
        assert!(search.results.is_empty());
    }

    #[test]
    fn test_game_details_with_background() {
        let details: GameDetails = serde_json::from_str(
            r#"{ "background_image": "https://media.rawg.io/media/games/hades.jpg" }"#,
        )
        .unwrap();
        assert_eq!(
            details.background_image.as_deref(),
            Some("https://media.rawg.io/media/games/hades.jpg")
        );
    }

    #[test]
    fn test_game_details_without_background() {
        let details: GameDetails = serde_json::from_str(r#"{ "background_image": null }"#).unwrap();
        assert_eq!(details.background_image, None);
    }
}
