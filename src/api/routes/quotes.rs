//! Quote Routes
//!
//! - POST /api/quotes - Submit a completed (or partial) wizard form
//!
//! The record is inserted first, then the notification is sent. A failed
//! send after a successful insert is logged only; the record stays.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::QuoteCreatedResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::email::{quote_email, QuoteEmailFields};
use crate::quote::{Progress, QuoteFormData};

/// POST /api/quotes
pub async fn submit_quote(
    State(state): State<Arc<AppState>>,
    Json(form): Json<QuoteFormData>,
) -> ApiResult<(StatusCode, Json<QuoteCreatedResponse>)> {
    let progress = Progress::of(&form);
    tracing::info!(
        completed_steps = progress.completed,
        total_steps = progress.total,
        "Quote submitted"
    );

    let records = state.quotes.insert_quote(&form).await?;

    let fields = QuoteEmailFields::from_form(&form);
    let sent = match quote_email(
        &fields,
        &state.config.email.from,
        &state.config.email.notify_to,
    ) {
        Ok(message) => state.email.send(message).await,
        Err(e) => Err(e),
    };
    if let Err(e) = sent {
        tracing::error!(
            provider = state.email.name(),
            error = %e,
            "Quote stored but notification failed"
        );
    }

    Ok((StatusCode::CREATED, Json(QuoteCreatedResponse { data: records })))
}
