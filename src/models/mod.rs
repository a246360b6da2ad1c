use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub mod cards;

pub use cards::{
    Card, DeliveryCard, GameCard, IndoorDateCard, LocalActivityCard, MovieCard, OutdoorDateCard,
    RestaurantCard, ShowCard, WeekendTripCard,
};

/// The closed set of swipe categories.
///
/// Wire names match the client exactly, spaces and slash included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Restaurants")]
    Restaurants,
    #[serde(rename = "Takeout/Delivery")]
    Delivery,
    #[serde(rename = "Shows")]
    Shows,
    #[serde(rename = "Movies")]
    Movies,
    #[serde(rename = "Indoor Date Activities")]
    IndoorDates,
    #[serde(rename = "Outdoor Date Activities")]
    OutdoorDates,
    #[serde(rename = "Things To Do Nearby")]
    LocalActivities,
    #[serde(rename = "Weekend Trip Ideas")]
    WeekendTrips,
    #[serde(rename = "Games")]
    Games,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Restaurants,
        Category::Delivery,
        Category::Shows,
        Category::Movies,
        Category::IndoorDates,
        Category::OutdoorDates,
        Category::LocalActivities,
        Category::WeekendTrips,
        Category::Games,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurants => "Restaurants",
            Category::Delivery => "Takeout/Delivery",
            Category::Shows => "Shows",
            Category::Movies => "Movies",
            Category::IndoorDates => "Indoor Date Activities",
            Category::OutdoorDates => "Outdoor Date Activities",
            Category::LocalActivities => "Things To Do Nearby",
            Category::WeekendTrips => "Weekend Trip Ideas",
            Category::Games => "Games",
        }
    }

    /// Short lowercase identifier, safe for cache key names
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Restaurants => "restaurants",
            Category::Delivery => "takeout-delivery",
            Category::Shows => "shows",
            Category::Movies => "movies",
            Category::IndoorDates => "indoor-dates",
            Category::OutdoorDates => "outdoor-dates",
            Category::LocalActivities => "local-activities",
            Category::WeekendTrips => "weekend-trips",
            Category::Games => "games",
        }
    }

    /// Whether generated results should be grounded near the user's zip code
    pub fn is_location_relevant(&self) -> bool {
        matches!(
            self,
            Category::Restaurants
                | Category::Delivery
                | Category::OutdoorDates
                | Category::LocalActivities
                | Category::WeekendTrips
        )
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| AppError::UnknownCategory(s.to_string()))
    }
}

/// Price bracket used in both preferences and restaurant-style cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Upscale,
}

/// Image provenance attached to an enriched card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub link: String,
}

impl Attribution {
    pub fn tmdb() -> Self {
        Self {
            provider: "TMDB".to_string(),
            author: None,
            link: "https://www.themoviedb.org/".to_string(),
        }
    }

    pub fn foursquare() -> Self {
        Self {
            provider: "Foursquare".to_string(),
            author: None,
            link: "https://foursquare.com".to_string(),
        }
    }

    pub fn rawg() -> Self {
        Self {
            provider: "RAWG".to_string(),
            author: None,
            link: "https://rawg.io".to_string(),
        }
    }

    pub fn unsplash(author: Option<String>, link: String) -> Self {
        Self {
            provider: "Unsplash".to_string(),
            author,
            link,
        }
    }
}

// Defaulting policy for normalization output. Only category, condensedInput
// and userInput are mandatory from the model; everything else falls back here.
pub const DEFAULT_VIBE: &str = "anything";
pub const DEFAULT_LOCATION: u32 = 0;
pub const DEFAULT_GROUP_SIZE: u32 = 2;

/// Normalized user intent produced by the preference-normalization stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceInput {
    pub category: Category,
    pub condensed_input: String,
    pub price_range: PriceRange,
    pub vibe: String,
    /// Zip code; 0 means "not provided"
    pub location: u32,
    pub group_size: u32,
    /// Original raw free text, preserved for audit/debugging
    pub user_input: String,
}

/// Nullable decode target for the model's normalization output, before
/// the defaulting policy is applied
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPreferenceInput {
    pub category: Category,
    pub condensed_input: String,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub vibe: Option<String>,
    #[serde(default)]
    pub location: Option<u32>,
    #[serde(default)]
    pub group_size: Option<u32>,
    pub user_input: String,
}

impl From<RawPreferenceInput> for PreferenceInput {
    fn from(raw: RawPreferenceInput) -> Self {
        Self {
            category: raw.category,
            condensed_input: raw.condensed_input,
            price_range: raw.price_range.unwrap_or_default(),
            vibe: raw.vibe.unwrap_or_else(|| DEFAULT_VIBE.to_string()),
            location: raw.location.unwrap_or(DEFAULT_LOCATION),
            group_size: raw.group_size.unwrap_or(DEFAULT_GROUP_SIZE),
            user_input: raw.user_input,
        }
    }
}

impl PreferenceInput {
    /// Copy with the raw free text zeroed out, embedded in the generation
    /// prompt to save tokens
    pub fn compacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert("userInput".to_string(), serde_json::Value::Null);
        }
        value
    }
}
