//! Email Routes
//!
//! - POST /api/send-email - Send the quote notification

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{EmailErrorResponse, EmailSentResponse};
use crate::api::state::AppState;
use crate::email::{quote_email, EmailError, QuoteEmailFields};

/// Body returned for any failure that is not a provider rejection
pub const SEND_FAILURE_MESSAGE: &str = "Error sending email";

/// POST /api/send-email
///
/// `{ data }` with 200 when the provider accepts the message, `{ error }`
/// with 400 when it rejects it, and `{ error: "Error sending email" }` with
/// 500 for anything else, including a body that cannot be read.
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QuoteEmailFields>, JsonRejection>,
) -> Response {
    let fields = match body {
        Ok(Json(fields)) => fields,
        Err(rejection) => {
            tracing::error!(error = %rejection, "Unreadable send-email body");
            return send_failure();
        }
    };

    let message = match quote_email(
        &fields,
        &state.config.email.from,
        &state.config.email.notify_to,
    ) {
        Ok(message) => message,
        Err(e) => {
            tracing::error!(error = %e, "Could not build notification email");
            return send_failure();
        }
    };

    match state.email.send(message).await {
        Ok(receipt) => (StatusCode::OK, Json(EmailSentResponse { data: receipt })).into_response(),
        Err(EmailError::Provider(error)) => {
            (StatusCode::BAD_REQUEST, Json(EmailErrorResponse { error })).into_response()
        }
        Err(e) => {
            tracing::error!(provider = state.email.name(), error = %e, "Email send failed");
            send_failure()
        }
    }
}

fn send_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(EmailErrorResponse {
            error: SEND_FAILURE_MESSAGE,
        }),
    )
        .into_response()
}
