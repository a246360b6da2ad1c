//! Prompt construction for the two model stages.
//!
//! Both prompts embed a schema description rendered straight from the
//! registry, so prompt and validator can never drift apart.

use crate::{
    models::{Category, PreferenceInput},
    schema::{card_schema, preference_schema},
};

/// How many candidates to ask for; over-generated so the fallback filter's
/// drops still leave a full deck
pub const GENERATION_TARGET: usize = 15;

/// Builds the Stage A prompt: normalize raw free text into the structured
/// preference object
pub fn normalization_prompt(input: &str, category: Category, location: u32) -> String {
    format!(
        r#"Map the following user input into a structured JSON object that conforms to this shape:
{schema}
Instructions:
- If the category does not match the user input (i.e. Restaurants != "Find me a movie..."), then immediately return an empty string ("").
- Respond ONLY with the JSON object, no extra text.
- For fields with restricted values, use only the allowed values.
- If there is no corresponding value for a field, use null as the value.
- Populate the condensedInput field with a concise sentence extracting key info from the user input.
User input: "{input}"
Category: "{category}"
Location: "{location}"
"#,
        schema = preference_schema().prompt_description(),
        input = input,
        category = category,
        location = location,
    )
}

/// Builds the Stage B prompt: generate candidate cards from the normalized
/// preferences. The raw free text is zeroed out of the embedded object to
/// save tokens.
pub fn generation_prompt(category: Category, prefs: &PreferenceInput) -> String {
    let compact = serde_json::to_string(&prefs.compacted()).unwrap_or_default();

    format!(
        r#"Use the following as search filters: {filters}
and use them to generate {count} JSON objects that conform to this shape: {schema}
Restrictions:
- Respond ONLY with a JSON array of the objects, no extra text.
- If location (zip code) is provided (non 0) and the category requires a location, search online using web search for real results centered around that zip code.
- Ideally, the {count} results should be varied and cover different aspects of the category.
- Each object should be a valid JSON object with ALL of the fields populated.
- If a field is less applicable, apply your best judgment to fill it with a reasonable value.
- Do not append source citations or URLs to any text field.
- The description field should be a concise summary of the card's content.
"#,
        filters = compact,
        count = GENERATION_TARGET,
        schema = card_schema(category).prompt_description(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceRange;

    fn prefs() -> PreferenceInput {
        PreferenceInput {
            category: Category::Restaurants,
            condensed_input: "cozy italian dinner for two".to_string(),
            price_range: PriceRange::Moderate,
            vibe: "cozy".to_string(),
            location: 10001,
            group_size: 2,
            user_input: "somewhere cozy for pasta night".to_string(),
        }
    }

    #[test]
    fn test_normalization_prompt_embeds_inputs() {
        let prompt = normalization_prompt("somewhere cozy for pasta", Category::Restaurants, 10001);
        assert!(prompt.contains("User input: \"somewhere cozy for pasta\""));
        assert!(prompt.contains("Category: \"Restaurants\""));
        assert!(prompt.contains("Location: \"10001\""));
        assert!(prompt.contains("\"condensedInput\": string"));
        assert!(prompt.contains("return an empty string"));
    }

    #[test]
    fn test_generation_prompt_embeds_schema_and_count() {
        let prompt = generation_prompt(Category::Restaurants, &prefs());
        assert!(prompt.contains("generate 15 JSON objects"));
        assert!(prompt.contains("\"priceRange\": \"$\" | \"$$\" | \"$$$\""));
        assert!(prompt.contains("Do not append source citations"));
    }

    #[test]
    fn test_generation_prompt_compacts_user_input() {
        let prompt = generation_prompt(Category::Restaurants, &prefs());
        assert!(prompt.contains("\"userInput\":null"));
        assert!(!prompt.contains("pasta night"));
    }
}
