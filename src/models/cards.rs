use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Attribution, Category, PriceRange};

/// One candidate recommendation shown to users for swiping.
///
/// Closed tagged union, one variant per category. Serialized untagged so the
/// wire shape stays a flat per-category object; decoding always goes through
/// [`Card::decode`] with an explicit category, never through shape guessing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Card {
    Restaurant(RestaurantCard),
    Delivery(DeliveryCard),
    Show(ShowCard),
    Movie(MovieCard),
    IndoorDate(IndoorDateCard),
    OutdoorDate(OutdoorDateCard),
    LocalActivity(LocalActivityCard),
    WeekendTrip(WeekendTripCard),
    Game(GameCard),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCard {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub price_range: Option<PriceRange>,
    pub vibe: Option<String>,
    pub distance: Option<String>,
    pub location: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCard {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub price_range: Option<PriceRange>,
    pub delivery_time: Option<String>,
    pub delivery_platform: Option<String>,
    pub rating: Option<f64>,
    pub vibe: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShowCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub seasons: Option<u32>,
    pub rating: Option<String>,
    pub platform: Option<String>,
    pub vibe: Option<String>,
    pub release_year: Option<i32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovieCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<String>,
    pub runtime: Option<String>,
    pub release_year: Option<i32>,
    pub platform: Option<String>,
    pub vibe: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IndoorDateCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub vibe: Option<String>,
    pub cost: Option<String>,
    pub duration: Option<String>,
    pub supplies: Option<Vec<String>>,
    pub ideal_time: Option<String>,
    pub mess_level: Option<MessLevel>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutdoorDateCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub vibe: Option<String>,
    pub cost: Option<String>,
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub best_time: Option<String>,
    pub location_type: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocalActivityCard {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Kind of venue, e.g. "museum", "arcade"
    #[serde(rename = "category")]
    pub kind: Option<String>,
    pub price: Option<String>,
    pub distance: Option<String>,
    pub rating: Option<f64>,
    pub hours: Option<String>,
    pub vibe: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeekendTripCard {
    pub destination: Option<String>,
    pub description: Option<String>,
    pub travel_time: Option<String>,
    pub vibe: Option<String>,
    pub cost: Option<String>,
    pub main_attractions: Option<Vec<String>>,
    pub season: Option<String>,
    pub lodging: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameCard {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub game_type: Option<GameType>,
    pub description: Option<String>,
    pub vibe: Option<String>,
    pub player_count: Option<String>,
    pub average_playtime: Option<String>,
    pub platform: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "Board Game")]
    Board,
    #[serde(rename = "Video Game")]
    Video,
    #[serde(rename = "Card Game")]
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessLevel {
    Clean,
    #[serde(rename = "Some Cleanup")]
    SomeCleanup,
    #[serde(rename = "Very Messy")]
    VeryMessy,
}

impl Card {
    /// Decodes a validated JSON object into the variant for `category`
    pub fn decode(category: Category, value: Value) -> serde_json::Result<Card> {
        Ok(match category {
            Category::Restaurants => Card::Restaurant(serde_json::from_value(value)?),
            Category::Delivery => Card::Delivery(serde_json::from_value(value)?),
            Category::Shows => Card::Show(serde_json::from_value(value)?),
            Category::Movies => Card::Movie(serde_json::from_value(value)?),
            Category::IndoorDates => Card::IndoorDate(serde_json::from_value(value)?),
            Category::OutdoorDates => Card::OutdoorDate(serde_json::from_value(value)?),
            Category::LocalActivities => Card::LocalActivity(serde_json::from_value(value)?),
            Category::WeekendTrips => Card::WeekendTrip(serde_json::from_value(value)?),
            Category::Games => Card::Game(serde_json::from_value(value)?),
        })
    }

    /// The card's display name (name / title / destination)
    pub fn primary_label(&self) -> Option<&str> {
        match self {
            Card::Restaurant(c) => c.name.as_deref(),
            Card::Delivery(c) => c.name.as_deref(),
            Card::Show(c) => c.title.as_deref(),
            Card::Movie(c) => c.title.as_deref(),
            Card::IndoorDate(c) => c.title.as_deref(),
            Card::OutdoorDate(c) => c.title.as_deref(),
            Card::LocalActivity(c) => c.name.as_deref(),
            Card::WeekendTrip(c) => c.destination.as_deref(),
            Card::Game(c) => c.title.as_deref(),
        }
    }

    /// Keyword source for the generic image-search fallback
    pub fn vibe(&self) -> Option<&str> {
        match self {
            Card::Restaurant(c) => c.vibe.as_deref(),
            Card::Delivery(c) => c.vibe.as_deref(),
            Card::Show(c) => c.vibe.as_deref(),
            Card::Movie(c) => c.vibe.as_deref(),
            Card::IndoorDate(c) => c.vibe.as_deref(),
            Card::OutdoorDate(c) => c.vibe.as_deref(),
            Card::LocalActivity(c) => c.vibe.as_deref(),
            Card::WeekendTrip(c) => c.vibe.as_deref(),
            Card::Game(c) => c.vibe.as_deref(),
        }
    }

    /// Street address or area, used as the "near" hint for place searches
    pub fn location_hint(&self) -> Option<&str> {
        match self {
            Card::Restaurant(c) => c.location.as_deref(),
            Card::Delivery(c) => c.location.as_deref(),
            Card::LocalActivity(c) => c.location.as_deref(),
            _ => None,
        }
    }

    pub fn is_video_game(&self) -> bool {
        matches!(self, Card::Game(c) if c.game_type == Some(GameType::Video))
    }

    /// Attaches enrichment output, replacing whatever was there before
    pub fn set_images(&mut self, images: Vec<String>, attribution: Option<Attribution>) {
        let (imgs, attr) = match self {
            Card::Restaurant(c) => (&mut c.images, &mut c.attribution),
            Card::Delivery(c) => (&mut c.images, &mut c.attribution),
            Card::Show(c) => (&mut c.images, &mut c.attribution),
            Card::Movie(c) => (&mut c.images, &mut c.attribution),
            Card::IndoorDate(c) => (&mut c.images, &mut c.attribution),
            Card::OutdoorDate(c) => (&mut c.images, &mut c.attribution),
            Card::LocalActivity(c) => (&mut c.images, &mut c.attribution),
            Card::WeekendTrip(c) => (&mut c.images, &mut c.attribution),
            Card::Game(c) => (&mut c.images, &mut c.attribution),
        };
        *imgs = images;
        *attr = attribution;
    }

    pub fn images(&self) -> &[String] {
        match self {
            Card::Restaurant(c) => &c.images,
            Card::Delivery(c) => &c.images,
            Card::Show(c) => &c.images,
            Card::Movie(c) => &c.images,
            Card::IndoorDate(c) => &c.images,
            Card::OutdoorDate(c) => &c.images,
            Card::LocalActivity(c) => &c.images,
            Card::WeekendTrip(c) => &c.images,
            Card::Game(c) => &c.images,
        }
    }

    pub fn attribution(&self) -> Option<&Attribution> {
        match self {
            Card::Restaurant(c) => c.attribution.as_ref(),
            Card::Delivery(c) => c.attribution.as_ref(),
            Card::Show(c) => c.attribution.as_ref(),
            Card::Movie(c) => c.attribution.as_ref(),
            Card::IndoorDate(c) => c.attribution.as_ref(),
            Card::OutdoorDate(c) => c.attribution.as_ref(),
            Card::LocalActivity(c) => c.attribution.as_ref(),
            Card::WeekendTrip(c) => c.attribution.as_ref(),
            Card::Game(c) => c.attribution.as_ref(),
        }
    }

    /// Mutable references to the card's free-text fields, in schema order.
    ///
    /// List-typed fields (`supplies`, `mainAttractions`) and the trailing
    /// media fields are deliberately excluded.
    pub fn text_fields_mut(&mut self) -> Vec<&mut Option<String>> {
        match self {
            Card::Restaurant(c) => vec![
                &mut c.name,
                &mut c.description,
                &mut c.cuisine,
                &mut c.vibe,
                &mut c.distance,
                &mut c.location,
            ],
            Card::Delivery(c) => vec![
                &mut c.name,
                &mut c.description,
                &mut c.cuisine,
                &mut c.delivery_time,
                &mut c.delivery_platform,
                &mut c.vibe,
                &mut c.location,
            ],
            Card::Show(c) => vec![
                &mut c.title,
                &mut c.description,
                &mut c.genre,
                &mut c.rating,
                &mut c.platform,
                &mut c.vibe,
            ],
            Card::Movie(c) => vec![
                &mut c.title,
                &mut c.description,
                &mut c.genre,
                &mut c.rating,
                &mut c.runtime,
                &mut c.platform,
                &mut c.vibe,
            ],
            Card::IndoorDate(c) => vec![
                &mut c.title,
                &mut c.description,
                &mut c.vibe,
                &mut c.cost,
                &mut c.duration,
                &mut c.ideal_time,
            ],
            Card::OutdoorDate(c) => vec![
                &mut c.title,
                &mut c.description,
                &mut c.vibe,
                &mut c.cost,
                &mut c.distance,
                &mut c.duration,
                &mut c.best_time,
                &mut c.location_type,
            ],
            Card::LocalActivity(c) => vec![
                &mut c.name,
                &mut c.description,
                &mut c.kind,
                &mut c.price,
                &mut c.distance,
                &mut c.hours,
                &mut c.vibe,
                &mut c.location,
            ],
            Card::WeekendTrip(c) => vec![
                &mut c.destination,
                &mut c.description,
                &mut c.travel_time,
                &mut c.vibe,
                &mut c.cost,
                &mut c.season,
                &mut c.lodging,
            ],
            Card::Game(c) => vec![
                &mut c.title,
                &mut c.description,
                &mut c.vibe,
                &mut c.player_count,
                &mut c.average_playtime,
                &mut c.platform,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_movie_card() {
        let value = json!({
            "title": "Dune",
            "description": "A noble family's heir leads a desert rebellion.",
            "genre": "Sci-Fi",
            "rating": "8.0",
            "runtime": "2h35m",
            "releaseYear": 2021,
            "platform": "HBO Max",
            "vibe": "epic, tense"
        });

        let card = Card::decode(Category::Movies, value).unwrap();
        assert_eq!(card.primary_label(), Some("Dune"));
        assert_eq!(card.vibe(), Some("epic, tense"));
        assert!(card.images().is_empty());
        assert!(card.attribution().is_none());
    }

    #[test]
    fn test_decode_game_card_type_enum() {
        let value = json!({
            "title": "Catan",
            "type": "Board Game",
            "description": "Trade and build settlements.",
            "vibe": "competitive, social",
            "playerCount": "3-4",
            "averagePlaytime": "90 Min",
            "difficulty": "Medium"
        });

        let card = Card::decode(Category::Games, value).unwrap();
        assert!(!card.is_video_game());
    }

    #[test]
    fn test_video_game_detection() {
        let card = Card::Game(GameCard {
            title: Some("Hades".to_string()),
            game_type: Some(GameType::Video),
            ..Default::default()
        });
        assert!(card.is_video_game());
    }

    #[test]
    fn test_location_hint_only_for_place_cards() {
        let restaurant = Card::Restaurant(RestaurantCard {
            location: Some("123 Main St".to_string()),
            ..Default::default()
        });
        assert_eq!(restaurant.location_hint(), Some("123 Main St"));

        let movie = Card::Movie(MovieCard::default());
        assert_eq!(movie.location_hint(), None);
    }

    #[test]
    fn test_set_images_replaces_media_fields() {
        let mut card = Card::Show(ShowCard::default());
        card.set_images(
            vec!["https://img.example/poster.jpg".to_string()],
            Some(Attribution::tmdb()),
        );
        assert_eq!(card.images().len(), 1);
        assert_eq!(card.attribution().unwrap().provider, "TMDB");
    }

    #[test]
    fn test_untagged_serialization_is_flat() {
        let card = Card::Movie(MovieCard {
            title: Some("Dune".to_string()),
            ..Default::default()
        });
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["title"], "Dune");
        assert!(value.get("Movie").is_none());
    }
}
