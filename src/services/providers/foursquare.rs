/// Foursquare Places provider
///
/// Two calls per card: a name+location search resolving an opaque
/// `fsq_place_id`, then a photo listing for that place. Photo URLs are
/// assembled from the API's prefix/suffix pair at a fixed 600x400 size.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::PlaceImageSource,
};

const PLACES_API_VERSION: &str = "2025-06-17";
/// Foursquare taxonomy ID for "Dining and Drinking"
const FOOD_CATEGORY_ID: &str = "4d4b7105d754a06374d81259";
const PHOTO_SIZE: &str = "600x400";
const PHOTO_LIMIT: &str = "3";

#[derive(Clone)]
pub struct FoursquareClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct PlaceSearchResponse {
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    fsq_place_id: String,
}

#[derive(Debug, Deserialize)]
struct Photo {
    prefix: String,
    suffix: String,
}

impl FoursquareClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn photo_urls(photos: Vec<Photo>) -> Vec<String> {
        photos
            .into_iter()
            .map(|p| format!("{}{}{}", p.prefix, PHOTO_SIZE, p.suffix))
            .collect()
    }
}

#[async_trait::async_trait]
impl PlaceImageSource for FoursquareClient {
    async fn resolve_place(
        &self,
        name: &str,
        near: &str,
        food_only: bool,
    ) -> AppResult<Option<String>> {
        let url = format!("{}/places/search", self.api_url);

        let mut query = vec![
            ("query", name),
            ("near", near),
            ("sort", "DISTANCE"),
            ("limit", "1"),
        ];
        if food_only {
            query.push(("fsq_category_ids", FOOD_CATEGORY_ID));
        }

        let response = self
            .http_client
            .get(&url)
            .header("accept", "application/json")
            .header("X-Places-Api-Version", PLACES_API_VERSION)
            .bearer_auth(&self.api_key)
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Foursquare API returned status {}: {}",
                status, body
            )));
        }

        let search: PlaceSearchResponse = response.json().await?;
        let place_id = search.results.into_iter().next().map(|r| r.fsq_place_id);

        tracing::debug!(
            name = %name,
            near = %near,
            resolved = place_id.is_some(),
            provider = "foursquare",
            "Place ID lookup completed"
        );

        Ok(place_id)
    }

    async fn place_photos(&self, place_id: &str) -> AppResult<Vec<String>> {
        let url = format!("{}/places/{}/photos", self.api_url, place_id);

        let response = self
            .http_client
            .get(&url)
            .header("accept", "application/json")
            .header("X-Places-Api-Version", PLACES_API_VERSION)
            .bearer_auth(&self.api_key)
            .query(&[
                ("sort", "POPULAR"),
                ("limit", PHOTO_LIMIT),
                ("classifications", "food_or_drink,outdoor_or_storefront"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Foursquare API returned status {}: {}",
                status, body
            )));
        }

        let photos: Vec<Photo> = response.json().await?;
        Ok(Self::photo_urls(photos))
    }
}
