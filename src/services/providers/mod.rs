/// External collaborator abstractions
///
/// Every outbound call the pipeline makes goes through one of these traits:
/// model inference (OpenAI), screen-media posters (TMDB), place photos
/// (Foursquare), video-game artwork (RAWG) and generic keyword image search
/// (Unsplash). Each has exactly one reqwest-backed implementation; tests
/// substitute mocks.
use crate::error::AppResult;

pub mod foursquare;
pub mod openai;
pub mod rawg;
pub mod tmdb;
pub mod unsplash;

pub use foursquare::FoursquareClient;
pub use openai::OpenAiClient;
pub use rawg::RawgClient;
pub use tmdb::TmdbClient;
pub use unsplash::UnsplashClient;

/// Outcome of a model inference call.
///
/// A refusal is a distinct outcome from an error: the request succeeded but
/// the model declined to answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelResponse {
    pub text: Option<String>,
    pub refusal: Option<String>,
}

impl ModelResponse {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            refusal: None,
        }
    }
}

/// Movie vs. TV search index for screen-media lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Movie,
    Tv,
}

impl ScreenKind {
    pub fn as_path(&self) -> &'static str {
        match self {
            ScreenKind::Movie => "movie",
            ScreenKind::Tv => "tv",
        }
    }
}

/// First image hit for a keyword query, with uploader attribution
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordImage {
    pub url: String,
    pub author: Option<String>,
    pub author_link: Option<String>,
}

/// Model inference call, optionally tool-augmented with web search
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str, grounded: bool) -> AppResult<ModelResponse>;
}

/// Poster lookup for movies and shows
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaImageSource: Send + Sync {
    /// Returns the first matching title's poster URL, if any
    async fn poster_url(&self, title: &str, kind: ScreenKind) -> AppResult<Option<String>>;
}

/// Two-phase place photo lookup: resolve an opaque place ID by name and
/// location, then fetch a small ordered photo set for that ID
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaceImageSource: Send + Sync {
    async fn resolve_place(
        &self,
        name: &str,
        near: &str,
        food_only: bool,
    ) -> AppResult<Option<String>>;

    async fn place_photos(&self, place_id: &str) -> AppResult<Vec<String>>;
}

/// Two-phase video-game artwork lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GameImageSource: Send + Sync {
    async fn resolve_game(&self, title: &str) -> AppResult<Option<u64>>;

    async fn background_image(&self, game_id: u64) -> AppResult<Option<String>>;
}

/// Generic keyword image search (the fallback for everything else)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeywordImageSource: Send + Sync {
    async fn search_image(&self, keywords: &str) -> AppResult<Option<KeywordImage>>;
}
