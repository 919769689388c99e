//! Supabase GoTrue client
//!
//! Endpoints used:
//! - `GET  /auth/v1/user` resolves a token to its user
//! - `POST /auth/v1/token?grant_type=password` signs in
//! - `POST /auth/v1/logout` revokes the session

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthProvider, Session};

/// Configuration for the GoTrue client
#[derive(Debug, Clone)]
pub struct SupabaseAuthConfig {
    pub url: String,
    pub anon_key: String,
    pub request_timeout_ms: u64,
}

impl SupabaseAuthConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            request_timeout_ms: 10_000,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url.trim_end_matches('/'), path)
    }
}

/// Hosted auth provider client
pub struct SupabaseAuth {
    client: Client,
    config: SupabaseAuthConfig,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    user: GoTrueUser,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseAuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    async fn api_error(response: reqwest::Response) -> AuthError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        AuthError::Api { status, message }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn current_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        let response = self
            .client
            .get(self.config.endpoint("user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(AuthError::from_transport)?;

        match response.status() {
            status if status.is_success() => {
                let user: GoTrueUser = response.json().await?;
                Ok(Some(Session::new(access_token, user.id, user.email)))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.config.endpoint("token?grant_type=password"))
            .header("apikey", &self.config.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(AuthError::from_transport)?;

        match response.status() {
            status if status.is_success() => {
                let token: TokenResponse = response.json().await?;
                let mut session =
                    Session::new(token.access_token, token.user.id, token.user.email);
                if let Some(secs) = token.expires_in {
                    session = session.with_expiry(Utc::now() + Duration::seconds(secs));
                }
                tracing::info!(user_id = %session.user_id, "Signed in");
                Ok(session)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(AuthError::InvalidCredentials)
            }
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.config.endpoint("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(AuthError::from_transport)?;

        // An already-revoked token is as good as signed out
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!(user_id = %session.user_id, "Signed out");
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }
}
