//! Site Routes
//!
//! - GET /api/site - Public identifiers for analytics, scheduling and forms

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::config::SiteConfig;

/// GET /api/site
pub async fn site_settings(State(state): State<Arc<AppState>>) -> Json<SiteConfig> {
    Json(state.config.site.clone())
}
