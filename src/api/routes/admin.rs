//! Admin Routes
//!
//! - GET /admin - Admin console overview
//! - GET /admin/quotes/export - Quote requests as CSV
//!
//! Every handler runs the admin gate before doing anything else.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::dto::AdminOverview;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::{admin_gate, clear_session, token_from_jar, AdminAccess, Session};
use crate::quote::QuoteRecord;

const EXPORT_MAX_ROWS: usize = 10_000;

/// Run the admin gate; the `Err` side is the redirect to send back
async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<Session, Response> {
    let token = token_from_jar(jar);

    match admin_gate(
        state.auth.as_ref(),
        state.roles.as_ref(),
        token.as_deref(),
        &state.guard.admin_login_path,
    )
    .await
    {
        AdminAccess::Granted(session) => Ok(session),
        AdminAccess::Denied {
            redirect_to,
            signed_out: true,
        } => Err((clear_session(jar.clone()), Redirect::to(&redirect_to)).into_response()),
        AdminAccess::Denied { redirect_to, .. } => Err(Redirect::to(&redirect_to).into_response()),
    }
}

/// GET /admin
pub async fn admin_overview(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<Response> {
    let session = match require_admin(&state, &jar).await {
        Ok(session) => session,
        Err(redirect) => return Ok(redirect),
    };

    let quote_count = state.quotes.count_quotes(&session).await?;
    let recent_quotes = state
        .quotes
        .recent_quotes(&session, state.config.recent_quotes_limit)
        .await?;

    Ok(Json(AdminOverview {
        admin_email: session.email,
        quote_count,
        recent_quotes,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /admin/quotes/export
pub async fn export_quotes(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let session = match require_admin(&state, &jar).await {
        Ok(session) => session,
        Err(redirect) => return Ok(redirect),
    };

    let limit = params.limit.unwrap_or(EXPORT_MAX_ROWS).min(EXPORT_MAX_ROWS);
    let records = state.quotes.recent_quotes(&session, limit).await?;
    let body = format_csv(&records)?;

    tracing::info!(user_id = %session.user_id, rows = records.len(), "Exported quote requests");

    let filename = format!("quote_requests_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}

const CSV_HEADER: [&str; 11] = [
    "id",
    "created_at",
    "gender",
    "date_of_birth",
    "health_status",
    "coverage_amount",
    "term_length",
    "first_name",
    "last_name",
    "email",
    "phone",
];

/// Render records as CSV with snake_case column headers
fn format_csv(records: &[QuoteRecord]) -> ApiResult<Vec<u8>> {
    fn opt<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(|v| v.to_string()).unwrap_or_default()
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_err = |e: csv::Error| ApiError::Internal(format!("CSV error: {}", e));

    writer.write_record(CSV_HEADER).map_err(csv_err)?;

    for record in records {
        let row = &record.row;
        writer
            .write_record([
                record.id.to_string(),
                row.created_at.to_rfc3339(),
                row.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
                opt(&row.date_of_birth),
                row.health_status
                    .map(|h| h.as_str().to_string())
                    .unwrap_or_default(),
                opt(&row.coverage_amount),
                opt(&row.term_length.map(|t| t.years())),
                opt(&row.first_name),
                opt(&row.last_name),
                opt(&row.email),
                opt(&row.phone),
            ])
            .map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))
}
