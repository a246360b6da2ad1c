//! Critical-field quality gate.
//!
//! Cards missing any of their category's critical fields are dropped before
//! they ever reach the client; better fewer complete cards than
//! partially-populated ones. Drops are silent, the caller only observes a
//! possibly-shorter array.

use serde_json::Value;

use crate::{
    models::{Card, Category},
    schema::{card_schema, CardSchema},
};

/// Keeps only the cards whose critical fields are all populated
pub fn apply_fallbacks(category: Category, cards: Vec<Card>) -> Vec<Card> {
    let schema = card_schema(category);
    let before = cards.len();

    let kept: Vec<Card> = cards
        .into_iter()
        .filter(|card| has_critical_fields(card, schema))
        .collect();

    if kept.len() < before {
        tracing::info!(
            category = %category,
            dropped = before - kept.len(),
            kept = kept.len(),
            "Dropped cards missing critical fields"
        );
    }

    kept
}

fn has_critical_fields(card: &Card, schema: &CardSchema) -> bool {
    let value = serde_json::to_value(card).unwrap_or(Value::Null);

    schema.critical_fields().all(|name| match value.get(name) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieCard, PriceRange, RestaurantCard};

    fn full_restaurant(name: &str) -> Card {
        Card::Restaurant(RestaurantCard {
            name: Some(name.to_string()),
            description: Some("Good food.".to_string()),
            cuisine: Some("Italian".to_string()),
            price_range: Some(PriceRange::Moderate),
            vibe: Some("cozy, warm".to_string()),
            distance: Some("2 mi".to_string()),
            location: Some("12 Elm St".to_string()),
            rating: Some(4.5),
            ..Default::default()
        })
    }

    #[test]
    fn test_complete_cards_pass() {
        let cards = vec![full_restaurant("Al Forno"), full_restaurant("Nami")];
        let kept = apply_fallbacks(Category::Restaurants, cards);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_missing_distance_drops_restaurant() {
        let mut incomplete = full_restaurant("No Distance");
        if let Card::Restaurant(r) = &mut incomplete {
            r.distance = None;
        }

        let kept = apply_fallbacks(
            Category::Restaurants,
            vec![full_restaurant("Al Forno"), incomplete],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].primary_label(), Some("Al Forno"));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut incomplete = full_restaurant("Empty Name");
        if let Card::Restaurant(r) = &mut incomplete {
            r.name = Some(String::new());
        }

        let kept = apply_fallbacks(Category::Restaurants, vec![incomplete]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_non_critical_field_missing_is_fine() {
        let mut card = full_restaurant("No Cuisine");
        if let Card::Restaurant(r) = &mut card {
            r.cuisine = None;
        }

        let kept = apply_fallbacks(Category::Restaurants, vec![card]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_movie_missing_platform_dropped() {
        let card = Card::Movie(MovieCard {
            title: Some("Dune".to_string()),
            release_year: Some(2021),
            ..Default::default()
        });

        let kept = apply_fallbacks(Category::Movies, vec![card]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_output_never_longer_than_input() {
        let kept = apply_fallbacks(Category::Restaurants, vec![]);
        assert!(kept.is_empty());
    }
}
