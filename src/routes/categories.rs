use axum::Json;

use crate::models::Category;

/// Lists the selectable categories in display order
pub async fn list() -> Json<Vec<&'static str>> {
    Json(Category::ALL.iter().map(|c| c.as_str()).collect())
}
