use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    cached,
    db::CacheKey,
    error::{AppError, AppResult},
    models::Category,
    routes::AppState,
};

/// Cache TTL for generated decks
const GENERATION_TTL_SECONDS: u64 = 60 * 60 * 24;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub input: String,
    #[serde(default)]
    pub location: Option<u32>,
}

/// Cache envelope for a generated deck.
///
/// Cards are stored as raw JSON values: the wire shape is already the flat
/// per-category object, so cached decks replay byte-for-byte.
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedDeck {
    pub cards: Vec<Value>,
    pub cached_at: DateTime<Utc>,
}

/// Handler for the generation endpoint
pub async fn generate(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(request): Json<GenerateRequest>,
) -> AppResult<Json<Vec<Value>>> {
    let input = request.input.trim();
    if input.is_empty() {
        return Err(AppError::InvalidInput(
            "input must not be empty".to_string(),
        ));
    }

    let category: Category = category.parse()?;
    let location = request.location.unwrap_or(0);

    let key = CacheKey::Generation {
        category,
        input: input.to_string(),
        location,
    };

    let deck: AppResult<CachedDeck> = cached!(state.cache, key, GENERATION_TTL_SECONDS, async {
        let cards = state.pipeline.generate(category, input, location).await?;
        let cards = cards
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Card serialization error: {}", e)))?;

        Ok::<_, AppError>(CachedDeck {
            cards,
            cached_at: Utc::now(),
        })
    });

    Ok(Json(deck?.cards))
}
