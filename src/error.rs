use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::validation::ValidationReport;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No registered schema for category: {0}")]
    UnknownCategory(String),

    #[error("No response from the model")]
    EmptyResponse,

    #[error("Model response is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Model output did not conform to the {category} schema: {report}")]
    SchemaViolation {
        category: String,
        report: ValidationReport,
    },

    #[error("Model declined the request: {0}")]
    ModelRefusal(String),

    #[error("User input does not match the selected category")]
    CategoryMismatch,

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation-class failures: the pipeline ran but the model output
    /// (or the requested category) failed structural checks.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::MalformedJson(_)
                | AppError::SchemaViolation { .. }
                | AppError::UnknownCategory(_)
                | AppError::CategoryMismatch
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.is_validation() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            match self {
                AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
