//! Content Routes
//!
//! - GET /api/blog/categories - Every known category
//! - GET /api/blog/categories/:label - Icon and fallback image for a label

use axum::{extract::Path, Json};

use crate::api::dto::CategoryResponse;
use crate::content::BlogCategory;

fn describe(category: BlogCategory) -> CategoryResponse {
    CategoryResponse {
        category: category.label().to_string(),
        icon: category.icon().to_string(),
        image: category.fallback_image().to_string(),
    }
}

/// GET /api/blog/categories
pub async fn list_categories() -> Json<Vec<CategoryResponse>> {
    Json(BlogCategory::ALL.into_iter().map(describe).collect())
}

/// GET /api/blog/categories/:label
///
/// Unknown labels resolve to General.
pub async fn category(Path(label): Path<String>) -> Json<CategoryResponse> {
    Json(describe(BlogCategory::from_label(&label)))
}
