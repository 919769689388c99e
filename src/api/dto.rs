//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::email::EmailReceipt;
use crate::quote::QuoteRecord;

// ============================================
// EMAIL DTOs
// ============================================

/// `{ data }` on success
#[derive(Debug, Serialize, Deserialize)]
pub struct EmailSentResponse {
    pub data: EmailReceipt,
}

/// `{ error }` on provider rejection or unexpected failure
#[derive(Debug, Serialize, Deserialize)]
pub struct EmailErrorResponse<E> {
    pub error: E,
}

// ============================================
// QUOTE DTOs
// ============================================

/// Inserted rows returned from `POST /api/quotes`
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteCreatedResponse {
    pub data: Vec<QuoteRecord>,
}

// ============================================
// AUTH DTOs
// ============================================

/// Login form body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Path to continue to after sign in
    #[serde(default)]
    pub next: Option<String>,
}

// ============================================
// DASHBOARD DTOs
// ============================================

/// Agent dashboard view
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardView {
    pub user_email: Option<String>,
    pub recent_quotes: Vec<QuoteRecord>,
}

/// Admin console overview
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminOverview {
    pub admin_email: Option<String>,
    pub quote_count: usize,
    pub recent_quotes: Vec<QuoteRecord>,
}

// ============================================
// CONTENT DTOs
// ============================================

/// Presentation for one blog category label
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: String,
    pub icon: String,
    pub image: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    pub store_status: String,
    pub auth: String,
    pub email: String,
    pub uptime_seconds: u64,
    pub version: String,
}
