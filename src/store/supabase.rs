//! Supabase PostgREST Client
//!
//! Talks to `{url}/rest/v1` with the project's anon key. Row-level security
//! applies: reads use the caller's access token, inserts use the anon key.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use super::{QuoteStore, StoreError, StoreResult};
use crate::auth::{AuthError, RoleDirectory, Session};
use crate::quote::{QuoteFormData, QuoteRecord};

/// Configuration for the PostgREST client
#[derive(Debug, Clone)]
pub struct SupabaseStoreConfig {
    /// Project URL (e.g., "https://abc.supabase.co")
    pub url: String,
    /// Public anon key
    pub anon_key: String,
    /// Table receiving quote requests
    pub quotes_table: String,
    /// Table holding per-user roles
    pub profiles_table: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl SupabaseStoreConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            quotes_table: "quote_requests".to_string(),
            profiles_table: "profiles".to_string(),
            request_timeout_ms: 10_000,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), table)
    }
}

/// Hosted data store client
pub struct SupabaseStore {
    client: Client,
    config: SupabaseStoreConfig,
}

impl SupabaseStore {
    pub fn new(config: SupabaseStoreConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SupabaseStoreConfig {
        &self.config
    }

    /// Attach PostgREST auth headers. Without a user token the anon key is
    /// the bearer.
    fn authorize(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(self.config.anon_key.as_str());
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn try_insert(&self, form: &QuoteFormData) -> StoreResult<Vec<QuoteRecord>> {
        let url = self.config.table_url(&self.config.quotes_table);
        let row = form.to_row(Utc::now());

        let request = self
            .authorize(self.client.post(&url), None)
            .header("Prefer", "return=representation")
            .json(&[row]);

        let response = self.send(request).await?;
        let records: Vec<QuoteRecord> = response.json().await?;
        if records.is_empty() {
            return Err(StoreError::EmptyInsert);
        }
        Ok(records)
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request.send().await.map_err(StoreError::from_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(StoreError::Api { status, message })
        }
    }
}

#[async_trait]
impl QuoteStore for SupabaseStore {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn insert_quote(&self, form: &QuoteFormData) -> StoreResult<Vec<QuoteRecord>> {
        let result = self.try_insert(form).await;

        match &result {
            Ok(records) => {
                tracing::info!(table = %self.config.quotes_table, rows = records.len(), "Inserted quote request");
            }
            Err(e) => {
                tracing::error!(table = %self.config.quotes_table, error = %e, "Failed to insert quote request");
            }
        }

        result
    }

    async fn recent_quotes(
        &self,
        session: &Session,
        limit: usize,
    ) -> StoreResult<Vec<QuoteRecord>> {
        let url = format!(
            "{}?select=*&order=created_at.desc&limit={}",
            self.config.table_url(&self.config.quotes_table),
            limit
        );

        let request = self.authorize(self.client.get(&url), Some(&session.access_token));
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn count_quotes(&self, session: &Session) -> StoreResult<usize> {
        let url = format!(
            "{}?select=id",
            self.config.table_url(&self.config.quotes_table)
        );

        let request = self
            .authorize(self.client.head(&url), Some(&session.access_token))
            .header("Prefer", "count=exact");
        let response = self.send(request).await?;

        response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(total_from_content_range)
            .ok_or_else(|| {
                StoreError::Serialization("missing exact count in Content-Range".to_string())
            })
    }

    async fn check_health(&self) -> StoreResult<()> {
        let url = format!(
            "{}?select=id&limit=0",
            self.config.table_url(&self.config.quotes_table)
        );

        let request = self.authorize(self.client.head(&url), None);
        self.send(request).await.map(|_| ())
    }
}

/// Total from a PostgREST `Content-Range` such as `0-24/30` or `*/30`
fn total_from_content_range(value: &str) -> Option<usize> {
    value.rsplit_once('/')?.1.parse().ok()
}

#[derive(Debug, Deserialize)]
struct ProfileRole {
    role: Option<String>,
}

#[async_trait]
impl RoleDirectory for SupabaseStore {
    async fn is_admin(&self, session: &Session) -> Result<bool, AuthError> {
        let url = format!(
            "{}?select=role&id=eq.{}",
            self.config.table_url(&self.config.profiles_table),
            urlencoding::encode(&session.user_id)
        );

        let request = self.authorize(self.client.get(&url), Some(&session.access_token));
        let response = self
            .send(request)
            .await
            .map_err(|e| AuthError::RoleLookup(e.to_string()))?;

        let profiles: Vec<ProfileRole> = response
            .json()
            .await
            .map_err(|e| AuthError::RoleLookup(e.to_string()))?;

        Ok(profiles
            .iter()
            .any(|p| p.role.as_deref() == Some("admin")))
    }
}
