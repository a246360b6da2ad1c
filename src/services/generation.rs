//! Two-stage generation orchestrator.
//!
//! Stage A normalizes raw free text into a structured preference object with
//! an ungrounded model call. Stage B turns those preferences into a deck of
//! candidate cards with a web-search-grounded call, then runs the deck
//! through validation, the critical-field gate, text sanitization and image
//! enrichment. Any stage failure short-circuits the request.

use std::sync::Arc;
use std::time::Instant;

use crate::{
    config::MismatchPolicy,
    error::{AppError, AppResult},
    models::{Card, Category, PreferenceInput},
    services::{
        enrichment::ImageEnricher,
        fallbacks::apply_fallbacks,
        prompts::{generation_prompt, normalization_prompt},
        providers::{ModelClient, ModelResponse},
        sanitize::sanitize_cards,
        validation::{validate_cards, validate_preference},
    },
};

/// Maximum deck size returned to the client
pub const FINAL_CARD_COUNT: usize = 12;

pub struct GenerationPipeline {
    model: Arc<dyn ModelClient>,
    enricher: ImageEnricher,
    mismatch_policy: MismatchPolicy,
}

impl GenerationPipeline {
    pub fn new(
        model: Arc<dyn ModelClient>,
        enricher: ImageEnricher,
        mismatch_policy: MismatchPolicy,
    ) -> Self {
        Self {
            model,
            enricher,
            mismatch_policy,
        }
    }

    /// Runs the full pipeline for one request
    pub async fn generate(
        &self,
        category: Category,
        input: &str,
        location: u32,
    ) -> AppResult<Vec<Card>> {
        let prefs = self.normalize(category, input, location).await?;
        self.generate_cards(category, &prefs).await
    }

    /// Stage A: free text to structured preferences (ungrounded)
    async fn normalize(
        &self,
        category: Category,
        input: &str,
        location: u32,
    ) -> AppResult<PreferenceInput> {
        let prompt = normalization_prompt(input, category, location);

        let started = Instant::now();
        let response = self.model.generate(&prompt, false).await?;
        tracing::info!(
            category = %category,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Preference normalization completed"
        );

        if is_mismatch_signal(&response) {
            tracing::warn!(category = %category, "Model flagged a category/input mismatch");
            return match self.mismatch_policy {
                MismatchPolicy::Reject => Err(AppError::CategoryMismatch),
                MismatchPolicy::Ignore => Err(AppError::EmptyResponse),
            };
        }

        validate_preference(&response)
    }

    /// Stage B: preferences to an enriched deck (grounded)
    async fn generate_cards(
        &self,
        category: Category,
        prefs: &PreferenceInput,
    ) -> AppResult<Vec<Card>> {
        let prompt = generation_prompt(category, prefs);

        let started = Instant::now();
        let response = self.model.generate(&prompt, true).await?;
        tracing::info!(
            category = %category,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Card generation completed"
        );

        let cards = validate_cards(&response, category)?;
        let mut cards = apply_fallbacks(category, cards);
        cards.truncate(FINAL_CARD_COUNT);
        let cards = sanitize_cards(cards);

        let cards = self.enricher.enrich(category, prefs.location, cards).await;

        tracing::info!(
            category = %category,
            cards = cards.len(),
            "Generation pipeline completed"
        );
        Ok(cards)
    }
}

/// The normalization prompt instructs the model to answer with an empty
/// string when the free text does not belong to the selected category.
/// Only that answer is the mismatch signal: refusals and absent payloads
/// fall through to payload extraction, which classifies them as
/// `ModelRefusal` and `EmptyResponse`.
fn is_mismatch_signal(response: &ModelResponse) -> bool {
    if response.refusal.is_some() {
        return false;
    }
    matches!(
        response.text.as_deref().map(str::trim),
        Some("") | Some("\"\"")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::postgres::MockUsageRecorder;
    use crate::services::providers::{
        MockGameImageSource, MockKeywordImageSource, MockMediaImageSource, MockModelClient,
        MockPlaceImageSource,
    };
    use serde_json::json;

    fn enricher_with_posters() -> ImageEnricher {
        let mut media = MockMediaImageSource::new();
        media
            .expect_poster_url()
            .returning(|_, _| Ok(Some("https://image.tmdb.org/t/p/w500/x.jpg".to_string())));
        let mut metrics = MockUsageRecorder::new();
        metrics.expect_increment().returning(|_| ());

        ImageEnricher::new(
            Arc::new(media),
            Arc::new(MockPlaceImageSource::new()),
            Arc::new(MockGameImageSource::new()),
            Arc::new(MockKeywordImageSource::new()),
            Arc::new(metrics),
        )
    }

    fn preference_payload() -> String {
        json!({
            "category": "Movies",
            "condensedInput": "tense sci-fi",
            "priceRange": null,
            "vibe": "epic",
            "location": 0,
            "groupSize": 2,
            "userInput": "something like dune"
        })
        .to_string()
    }

    fn movie(title: &str) -> serde_json::Value {
        json!({
            "title": title,
            "description": "A film.",
            "genre": "Sci-Fi",
            "rating": "8.0",
            "runtime": "2h",
            "releaseYear": 2021,
            "platform": "Netflix",
            "vibe": "epic, tense"
        })
    }

    fn two_stage_model(card_payload: String) -> MockModelClient {
        let preference = preference_payload();
        let mut model = MockModelClient::new();
        model.expect_generate().returning(move |_, grounded| {
            if grounded {
                Ok(ModelResponse::with_text(card_payload.clone()))
            } else {
                Ok(ModelResponse::with_text(preference.clone()))
            }
        });
        model
    }

    #[tokio::test]
    async fn test_happy_path_produces_enriched_deck() {
        let payload = json!([movie("Dune"), movie("Arrival")]).to_string();
        let pipeline = GenerationPipeline::new(
            Arc::new(two_stage_model(payload)),
            enricher_with_posters(),
            MismatchPolicy::Reject,
        );

        let cards = pipeline
            .generate(Category::Movies, "something like dune", 0)
            .await
            .unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].images().len(), 1);
        assert_eq!(cards[0].attribution().unwrap().provider, "TMDB");
    }

    #[tokio::test]
    async fn test_deck_capped_at_final_count() {
        let deck: Vec<_> = (0..15).map(|i| movie(&format!("Movie {}", i))).collect();
        let payload = serde_json::to_string(&deck).unwrap();

        let pipeline = GenerationPipeline::new(
            Arc::new(two_stage_model(payload)),
            enricher_with_posters(),
            MismatchPolicy::Reject,
        );

        let cards = pipeline
            .generate(Category::Movies, "anything good", 0)
            .await
            .unwrap();

        assert_eq!(cards.len(), FINAL_CARD_COUNT);
        assert_eq!(cards[0].primary_label(), Some("Movie 0"));
        assert_eq!(cards[11].primary_label(), Some("Movie 11"));
    }

    #[tokio::test]
    async fn test_mismatch_rejected_under_default_policy() {
        let mut model = MockModelClient::new();
        model
            .expect_generate()
            .times(1)
            .returning(|_, _| Ok(ModelResponse::with_text("\"\"")));

        let pipeline = GenerationPipeline::new(
            Arc::new(model),
            enricher_with_posters(),
            MismatchPolicy::Reject,
        );

        let err = pipeline
            .generate(Category::Restaurants, "find me a movie", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CategoryMismatch));
    }

    #[tokio::test]
    async fn test_mismatch_ignored_policy_reports_empty_response() {
        let mut model = MockModelClient::new();
        model
            .expect_generate()
            .returning(|_, _| Ok(ModelResponse::with_text("")));

        let pipeline = GenerationPipeline::new(
            Arc::new(model),
            enricher_with_posters(),
            MismatchPolicy::Ignore,
        );

        let err = pipeline
            .generate(Category::Restaurants, "find me a movie", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_refusal_is_not_a_mismatch() {
        let mut model = MockModelClient::new();
        model.expect_generate().times(1).returning(|_, _| {
            Ok(ModelResponse {
                text: None,
                refusal: Some("I can't help with that.".to_string()),
            })
        });

        let pipeline = GenerationPipeline::new(
            Arc::new(model),
            enricher_with_posters(),
            MismatchPolicy::Reject,
        );

        let err = pipeline
            .generate(Category::Movies, "something epic", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ModelRefusal(_)));
    }

    #[tokio::test]
    async fn test_absent_payload_is_empty_response_not_mismatch() {
        let mut model = MockModelClient::new();
        model
            .expect_generate()
            .times(1)
            .returning(|_, _| Ok(ModelResponse::default()));

        let pipeline = GenerationPipeline::new(
            Arc::new(model),
            enricher_with_posters(),
            MismatchPolicy::Reject,
        );

        let err = pipeline
            .generate(Category::Movies, "something epic", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_stage_a_failure_skips_stage_b() {
        let mut model = MockModelClient::new();
        model
            .expect_generate()
            .times(1)
            .returning(|_, _| Ok(ModelResponse::with_text("not json {{")));

        let pipeline = GenerationPipeline::new(
            Arc::new(model),
            enricher_with_posters(),
            MismatchPolicy::Reject,
        );

        let err = pipeline
            .generate(Category::Movies, "something epic", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedJson(_)));
    }

    #[tokio::test]
    async fn test_incomplete_cards_filtered_before_enrichment() {
        let mut incomplete = movie("No Platform");
        incomplete["platform"] = json!(null);
        let payload = json!([movie("Dune"), incomplete]).to_string();

        let pipeline = GenerationPipeline::new(
            Arc::new(two_stage_model(payload)),
            enricher_with_posters(),
            MismatchPolicy::Reject,
        );

        let cards = pipeline
            .generate(Category::Movies, "something epic", 0)
            .await
            .unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].primary_label(), Some("Dune"));
    }

    #[tokio::test]
    async fn test_citations_stripped_from_returned_deck() {
        let mut cited = movie("Dune");
        cited["description"] = json!("A desert epic. (imdb.com)");
        let payload = json!([cited]).to_string();

        let pipeline = GenerationPipeline::new(
            Arc::new(two_stage_model(payload)),
            enricher_with_posters(),
            MismatchPolicy::Reject,
        );

        let cards = pipeline
            .generate(Category::Movies, "something epic", 0)
            .await
            .unwrap();

        match &cards[0] {
            Card::Movie(m) => assert_eq!(m.description.as_deref(), Some("A desert epic.")),
            other => panic!("expected movie card, got {:?}", other),
        }
    }
}
