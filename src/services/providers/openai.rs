/// OpenAI Responses API client
///
/// Single-turn, non-streaming calls. Card generation passes `grounded = true`
/// to attach the `web_search_preview` tool so the model can look up real
/// venues near the user's zip code.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::providers::{ModelClient, ModelResponse},
};

const MODEL: &str = "gpt-5-mini";

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// Collapses the response's output items into text and refusal payloads
    fn extract(response: ResponsesApiResponse) -> ModelResponse {
        let mut result = ModelResponse::default();

        for item in response.output {
            for part in item.content {
                match part.part_type.as_str() {
                    "output_text" => {
                        if result.text.is_none() {
                            result.text = part.text;
                        }
                    }
                    "refusal" => {
                        if result.refusal.is_none() {
                            result.refusal = part.refusal;
                        }
                    }
                    _ => {}
                }
            }
        }

        result
    }
}

#[async_trait::async_trait]
impl ModelClient for OpenAiClient {
    async fn generate(&self, prompt: &str, grounded: bool) -> AppResult<ModelResponse> {
        let url = format!("{}/v1/responses", self.api_url);

        let mut body = json!({
            "model": MODEL,
            "input": prompt,
        });
        if grounded {
            body["tools"] = json!([{ "type": "web_search_preview" }]);
        }

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenAI API returned status {}: {}",
                status, body
            )));
        }

        let parsed: ResponsesApiResponse = response.json().await?;
        Ok(Self::extract(parsed))
    }
}
