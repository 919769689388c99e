//! Dashboard Routes
//!
//! - GET /dashboard - Agent dashboard with the latest quote requests

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::api::dto::DashboardView;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::session_from_jar;

/// GET /dashboard
///
/// The guard has already redirected anonymous visitors; the session is
/// fetched again here because the view needs the user.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<Response> {
    let Some(session) = session_from_jar(state.auth.as_ref(), &jar).await else {
        return Ok(Redirect::to(&state.guard.login_path).into_response());
    };

    let recent_quotes = state
        .quotes
        .recent_quotes(&session, state.config.recent_quotes_limit)
        .await?;

    Ok(Json(DashboardView {
        user_email: session.email,
        recent_quotes,
    })
    .into_response())
}
