//! Model output validation.
//!
//! Extracts the text payload from a model response, parses it as JSON and
//! validates it against the registered schema for the target category,
//! handling both array payloads (card generation) and single objects
//! (preference normalization). Failures produce a structured report with a
//! per-index breakdown; retry policy belongs to the orchestrator, not here.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Card, Category, PreferenceInput, RawPreferenceInput},
    schema::{card_schema, preference_schema, FieldKind, FieldSpec},
    services::providers::ModelResponse,
};

/// One field-level problem in one item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// All problems found in one array element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemIssues {
    pub index: usize,
    pub issues: Vec<FieldIssue>,
}

/// Aggregate diagnostic for a failed validation pass
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: Vec<ItemIssues>,
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} valid, {} invalid of {} items: {}",
            self.valid,
            self.invalid.len(),
            self.total,
            serde_json::to_string(&self.invalid).unwrap_or_default()
        )
    }
}

/// Validates card-generation output against the category's schema
pub fn validate_cards(response: &ModelResponse, category: Category) -> AppResult<Vec<Card>> {
    let payload = extract_payload(response)?;
    let parsed = parse_json(payload)?;
    let schema = card_schema(category);

    // Array payload for generation, but a single object is accepted too
    let mut items = match parsed {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut report = ValidationReport {
        total: items.len(),
        ..Default::default()
    };

    for (index, item) in items.iter_mut().enumerate() {
        let issues = check_object(item, schema.fields);
        if issues.is_empty() {
            report.valid += 1;
        } else {
            report.invalid.push(ItemIssues { index, issues });
        }
    }

    if !report.invalid.is_empty() {
        for item in &report.invalid {
            tracing::error!(
                category = %category,
                index = item.index,
                issues = %serde_json::to_string(&item.issues).unwrap_or_default(),
                "Card failed schema validation"
            );
        }
        tracing::error!(
            category = %category,
            total = report.total,
            valid = report.valid,
            invalid = report.invalid.len(),
            "Model output failed validation"
        );
        return Err(AppError::SchemaViolation {
            category: category.to_string(),
            report,
        });
    }

    items
        .into_iter()
        .map(|item| {
            Card::decode(category, item)
                .map_err(|e| AppError::Internal(format!("Validated card failed to decode: {}", e)))
        })
        .collect()
}

/// Validates normalization output against the preference schema and applies
/// the defaulting policy
pub fn validate_preference(response: &ModelResponse) -> AppResult<PreferenceInput> {
    let payload = extract_payload(response)?;
    let mut parsed = parse_json(payload)?;

    let issues = if parsed.is_array() {
        vec![FieldIssue {
            field: "$".to_string(),
            message: "expected a single object, got an array".to_string(),
        }]
    } else {
        check_object(&mut parsed, preference_schema().fields)
    };

    if !issues.is_empty() {
        let report = ValidationReport {
            total: 1,
            valid: 0,
            invalid: vec![ItemIssues { index: 0, issues }],
        };
        tracing::error!(
            report = %report,
            "Preference normalization output failed validation"
        );
        return Err(AppError::SchemaViolation {
            category: "Prompt Input".to_string(),
            report,
        });
    }

    let raw: RawPreferenceInput = serde_json::from_value(parsed)
        .map_err(|e| AppError::Internal(format!("Validated preference failed to decode: {}", e)))?;
    Ok(PreferenceInput::from(raw))
}

/// Pulls the text payload out of a model response.
///
/// A refusal is surfaced as its own outcome; an absent or blank payload is
/// an empty response.
pub fn extract_payload(response: &ModelResponse) -> AppResult<&str> {
    if let Some(refusal) = &response.refusal {
        tracing::warn!(refusal = %refusal, "Model refused the request");
        return Err(AppError::ModelRefusal(refusal.clone()));
    }

    match response.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(AppError::EmptyResponse),
    }
}

fn parse_json(payload: &str) -> AppResult<Value> {
    serde_json::from_str(payload).map_err(|e| AppError::MalformedJson(e.to_string()))
}

/// Checks one JSON object against a field list, coercing benign type drift
/// (number <-> numeric string, float-typed integers) in place
fn check_object(item: &mut Value, fields: &[FieldSpec]) -> Vec<FieldIssue> {
    let obj = match item.as_object_mut() {
        Some(obj) => obj,
        None => {
            return vec![FieldIssue {
                field: "$".to_string(),
                message: format!("expected an object, got {}", type_name(item)),
            }]
        }
    };

    let mut issues = Vec::new();

    for spec in fields {
        let value = match obj.get_mut(spec.name) {
            Some(v) if !v.is_null() => v,
            _ => {
                if spec.required {
                    issues.push(FieldIssue {
                        field: spec.name.to_string(),
                        message: "required field is missing or null".to_string(),
                    });
                }
                continue;
            }
        };

        coerce(value, spec.kind);

        let ok = match spec.kind {
            FieldKind::Text => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::TextList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            FieldKind::OneOf(allowed) => value
                .as_str()
                .map(|s| allowed.contains(&s))
                .unwrap_or(false),
        };

        if !ok {
            let message = match spec.kind {
                FieldKind::Text => format!("expected string, got {}", type_name(value)),
                FieldKind::Number => format!("expected number, got {}", type_name(value)),
                FieldKind::TextList => {
                    format!("expected array of strings, got {}", type_name(value))
                }
                FieldKind::OneOf(allowed) => {
                    format!("expected one of {:?}, got {}", allowed, value)
                }
            };
            issues.push(FieldIssue {
                field: spec.name.to_string(),
                message,
            });
        }
    }

    issues
}

fn coerce(value: &mut Value, kind: FieldKind) {
    match kind {
        // Ratings drift between number and string across model runs
        FieldKind::Text => {
            if let Some(n) = value.as_f64() {
                *value = Value::String(if n.fract() == 0.0 {
                    format!("{}", n as i64)
                } else {
                    format!("{}", n)
                });
            }
        }
        FieldKind::Number => {
            if let Some(s) = value.as_str() {
                if let Ok(n) = s.trim().parse::<f64>() {
                    if let Some(num) = serde_json::Number::from_f64(n) {
                        *value = Value::Number(num);
                    }
                }
            }
            // Integer-shaped floats break integer-typed decode targets
            if let Some(n) = value.as_f64() {
                if n.fract() == 0.0 && value.as_i64().is_none() {
                    *value = Value::Number(serde_json::Number::from(n as i64));
                }
            }
        }
        FieldKind::TextList | FieldKind::OneOf(_) => {}
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn movie(title: &str) -> Value {
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

    #[test]
    fn test_valid_movie_array() {
        let payload = json!([movie("Dune"), movie("Arrival")]).to_string();
        let response = ModelResponse::with_text(payload);

        let cards = validate_cards(&response, Category::Movies).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].primary_label(), Some("Dune"));
    }

    #[test]
    fn test_invalid_enum_reports_offending_index_only() {
        // item 2 of 5 violates the priceRange enum constraint
        let payload = json!([
            restaurant("Al Forno"),
            restaurant("Nami"),
            {
                "name": "Bad Place",
                "description": "x",
                "cuisine": "Fusion",
                "priceRange": "$$$$",
                "vibe": "loud",
                "distance": "1 mi",
                "location": "Main St",
                "rating": 4.0
            },
            restaurant("Trattoria"),
            restaurant("Izakaya")
        ])
        .to_string();

        let response = ModelResponse::with_text(payload);
        let err = validate_cards(&response, Category::Restaurants).unwrap_err();

        match err {
            AppError::SchemaViolation { report, .. } => {
                assert_eq!(report.total, 5);
                assert_eq!(report.valid, 4);
                assert_eq!(report.invalid.len(), 1);
                assert_eq!(report.invalid[0].index, 2);
                assert_eq!(report.invalid[0].issues[0].field, "priceRange");
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    fn restaurant(name: &str) -> Value {
        json!({
            "name": name,
            "description": "Good food.",
            "cuisine": "Italian",
            "priceRange": "$$",
            "vibe": "cozy, warm, candlelit",
            "distance": "2 mi",
            "location": "12 Elm St",
            "rating": 4.5
        })
    }

    #[test]
    fn test_numeric_rating_coerced_to_string_for_movies() {
        let mut item = movie("Dune");
        item["rating"] = json!(8.0);
        let response = ModelResponse::with_text(json!([item]).to_string());

        let cards = validate_cards(&response, Category::Movies).unwrap();
        match &cards[0] {
            Card::Movie(m) => assert_eq!(m.rating.as_deref(), Some("8")),
            other => panic!("expected movie card, got {:?}", other),
        }
    }

    #[test]
    fn test_string_rating_coerced_to_number_for_restaurants() {
        let mut item = restaurant("Nami");
        item["rating"] = json!("4.5");
        let response = ModelResponse::with_text(json!([item]).to_string());

        let cards = validate_cards(&response, Category::Restaurants).unwrap();
        match &cards[0] {
            Card::Restaurant(r) => assert_eq!(r.rating, Some(4.5)),
            other => panic!("expected restaurant card, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        let response = ModelResponse::with_text("not json {{");
        let err = validate_cards(&response, Category::Movies).unwrap_err();
        assert!(matches!(err, AppError::MalformedJson(_)));
    }

    #[test]
    fn test_empty_response() {
        let response = ModelResponse::default();
        let err = validate_cards(&response, Category::Movies).unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse));
    }

    #[test]
    fn test_blank_payload_is_empty_response() {
        let response = ModelResponse::with_text("   ");
        let err = validate_cards(&response, Category::Movies).unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse));
    }

    #[test]
    fn test_refusal_is_distinct_outcome() {
        let response = ModelResponse {
            text: Some("[]".to_string()),
            refusal: Some("I can't help with that.".to_string()),
        };
        let err = validate_cards(&response, Category::Movies).unwrap_err();
        assert!(matches!(err, AppError::ModelRefusal(_)));
    }

    #[test]
    fn test_single_object_accepted_for_cards() {
        let response = ModelResponse::with_text(movie("Dune").to_string());
        let cards = validate_cards(&response, Category::Movies).unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_preference_happy_path_with_defaults() {
        let payload = json!({
            "category": "Restaurants",
            "condensedInput": "cozy italian dinner for two",
            "priceRange": null,
            "vibe": null,
            "location": 10001,
            "groupSize": null,
            "userInput": "somewhere cozy for pasta"
        })
        .to_string();
        let response = ModelResponse::with_text(payload);

        let prefs = validate_preference(&response).unwrap();
        assert_eq!(prefs.category, Category::Restaurants);
        assert_eq!(prefs.location, 10001);
        assert_eq!(prefs.group_size, 2);
    }

    #[test]
    fn test_preference_missing_condensed_input_is_violation() {
        let payload = json!({
            "category": "Movies",
            "userInput": "something epic"
        })
        .to_string();
        let response = ModelResponse::with_text(payload);

        let err = validate_preference(&response).unwrap_err();
        match err {
            AppError::SchemaViolation { report, .. } => {
                assert_eq!(report.invalid[0].issues[0].field, "condensedInput");
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_preference_rejects_array_payload() {
        let response = ModelResponse::with_text("[]");
        let err = validate_preference(&response).unwrap_err();
        assert!(matches!(err, AppError::SchemaViolation { .. }));
    }

    #[test]
    fn test_preference_unknown_category_value() {
        let payload = json!({
            "category": "Concerts",
            "condensedInput": "live music",
            "userInput": "find me a concert"
        })
        .to_string();
        let response = ModelResponse::with_text(payload);

        let err = validate_preference(&response).unwrap_err();
        match err {
            AppError::SchemaViolation { report, .. } => {
                assert_eq!(report.invalid[0].issues[0].field, "category");
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }
}
