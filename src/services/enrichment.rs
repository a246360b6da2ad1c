//! Category-routed image enrichment.
//!
//! Every card in a generated deck gets one image lookup, fanned out
//! concurrently with results re-attached by position. Screen media go to
//! TMDB, real-world places to Foursquare (with a keyword-search fallback),
//! video games to RAWG, and everything else to keyword search. A provider
//! failure never fails the deck; the affected card just ships without
//! images.

use futures::future::join_all;
use std::sync::Arc;

use crate::{
    db::postgres::SharedRecorder,
    models::{Attribution, Card, Category, DEFAULT_VIBE},
    services::providers::{
        GameImageSource, KeywordImageSource, MediaImageSource, PlaceImageSource, ScreenKind,
    },
};

pub const TMDB_COUNTER: &str = "TMDB_requests";
pub const FSQ_COUNTER: &str = "FSQ_requests";
pub const RAWG_COUNTER: &str = "RAWG_requests";
pub const UNSPLASH_COUNTER: &str = "Unsplash_requests";

/// Images plus their provenance for one card
type Media = (Vec<String>, Option<Attribution>);

#[derive(Clone)]
pub struct ImageEnricher {
    media: Arc<dyn MediaImageSource>,
    places: Arc<dyn PlaceImageSource>,
    games: Arc<dyn GameImageSource>,
    keywords: Arc<dyn KeywordImageSource>,
    metrics: SharedRecorder,
}

impl ImageEnricher {
    pub fn new(
        media: Arc<dyn MediaImageSource>,
        places: Arc<dyn PlaceImageSource>,
        games: Arc<dyn GameImageSource>,
        keywords: Arc<dyn KeywordImageSource>,
        metrics: SharedRecorder,
    ) -> Self {
        Self {
            media,
            places,
            games,
            keywords,
            metrics,
        }
    }

    /// Attaches images to every card, preserving order and length
    pub async fn enrich(&self, category: Category, zip: u32, mut cards: Vec<Card>) -> Vec<Card> {
        let media = match category {
            Category::Movies => self.screen_media(&cards, ScreenKind::Movie).await,
            Category::Shows => self.screen_media(&cards, ScreenKind::Tv).await,
            Category::Restaurants | Category::Delivery => {
                self.place_photos(&cards, zip, true).await
            }
            Category::LocalActivities => self.place_photos(&cards, zip, false).await,
            Category::Games => self.game_art(&cards).await,
            _ => self.keyword_images(&cards).await,
        };

        for (card, (images, attribution)) in cards.iter_mut().zip(media) {
            card.set_images(images, attribution);
        }
        cards
    }

    async fn screen_media(&self, cards: &[Card], kind: ScreenKind) -> Vec<Media> {
        join_all(cards.iter().map(|card| async move {
            let Some(title) = card.primary_label() else {
                return (vec![], None);
            };

            self.metrics.increment(TMDB_COUNTER).await;
            match self.media.poster_url(title, kind).await {
                Ok(Some(url)) => (vec![url], Some(Attribution::tmdb())),
                Ok(None) => (vec![], None),
                Err(e) => {
                    tracing::warn!(title = %title, error = %e, "Poster lookup failed");
                    (vec![], None)
                }
            }
        }))
        .await
    }

    /// Two-phase place lookup: resolve every card's place ID concurrently,
    /// then fetch photo sets concurrently. Unresolved or photo-less places
    /// fall back to keyword search.
    async fn place_photos(&self, cards: &[Card], zip: u32, food_only: bool) -> Vec<Media> {
        let place_ids: Vec<Option<String>> = join_all(cards.iter().map(|card| {
            let near_default = zip.to_string();
            async move {
                let name = card.primary_label()?;
                let near = card.location_hint().unwrap_or(near_default.as_str());

                self.metrics.increment(FSQ_COUNTER).await;
                match self.places.resolve_place(name, near, food_only).await {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::warn!(name = %name, error = %e, "Place resolution failed");
                        None
                    }
                }
            }
        }))
        .await;

        join_all(
            cards
                .iter()
                .zip(place_ids)
                .map(|(card, place_id)| async move {
                    let Some(place_id) = place_id else {
                        return self.keyword_image(card).await;
                    };

                    self.metrics.increment(FSQ_COUNTER).await;
                    match self.places.place_photos(&place_id).await {
                        Ok(photos) if !photos.is_empty() => {
                            (photos, Some(Attribution::foursquare()))
                        }
                        Ok(_) => self.keyword_image(card).await,
                        Err(e) => {
                            tracing::warn!(place_id = %place_id, error = %e, "Place photo fetch failed");
                            self.keyword_image(card).await
                        }
                    }
                }),
        )
        .await
    }

    /// Two-phase artwork lookup for the video-game subset; tabletop games
    /// fall through to keyword search. Video games whose lookup fails stay
    /// image-less rather than taking the fallback.
    async fn game_art(&self, cards: &[Card]) -> Vec<Media> {
        let game_ids: Vec<Option<u64>> = join_all(cards.iter().map(|card| async move {
            if !card.is_video_game() {
                return None;
            }

            let title = card.primary_label()?;

            self.metrics.increment(RAWG_COUNTER).await;
            match self.games.resolve_game(title).await {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(title = %title, error = %e, "Game ID lookup failed");
                    None
                }
            }
        }))
        .await;

        join_all(
            cards
                .iter()
                .zip(game_ids)
                .map(|(card, game_id)| async move {
                    if !card.is_video_game() {
                        return self.keyword_image(card).await;
                    }

                    let Some(game_id) = game_id else {
                        return (vec![], None);
                    };

                    self.metrics.increment(RAWG_COUNTER).await;
                    match self.games.background_image(game_id).await {
                        Ok(Some(url)) => (vec![url], Some(Attribution::rawg())),
                        Ok(None) => (vec![], None),
                        Err(e) => {
                            tracing::warn!(game_id, error = %e, "Game artwork fetch failed");
                            (vec![], None)
                        }
                    }
                }),
        )
        .await
    }

    async fn keyword_images(&self, cards: &[Card]) -> Vec<Media> {
        join_all(cards.iter().map(|card| self.keyword_image(card))).await
    }

    async fn keyword_image(&self, card: &Card) -> Media {
        self.metrics.increment(UNSPLASH_COUNTER).await;

        let keywords = card.vibe().unwrap_or(DEFAULT_VIBE).replace(',', "");

        match self.keywords.search_image(&keywords).await {
            Ok(Some(hit)) => {
                let link = hit
                    .author_link
                    .unwrap_or_else(|| "https://unsplash.com".to_string());
                (vec![hit.url], Some(Attribution::unsplash(hit.author, link)))
            }
            Ok(None) => (vec![], None),
            Err(e) => {
                tracing::warn!(keywords = %keywords, error = %e, "Keyword image search failed");
                (vec![], None)
            }
        }
    }
}
