//! Defensive cleanup of model text output.
//!
//! Grounded generations sometimes append parenthetical source citations to
//! text fields ("Al Forno (tripadvisor.com)"). Truncate every descriptive
//! text field at the first `(` and trim; list fields and media fields pass
//! through untouched. Pure and idempotent.

use crate::models::Card;

/// Strips trailing parenthetical citations from every card's text fields
pub fn sanitize_cards(mut cards: Vec<Card>) -> Vec<Card> {
    for card in &mut cards {
        for field in card.text_fields_mut() {
            if let Some(text) = field {
                *field = Some(strip_citation(text));
            }
        }
    }
    cards
}

fn strip_citation(text: &str) -> String {
    match text.find('(') {
        Some(pos) => text[..pos].trim().to_string(),
        None => text.trim().to_string(),
    }
}
