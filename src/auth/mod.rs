//! Authentication and Access Control
//!
//! The hosted auth provider owns sessions; this module only asks it "who owns
//! this token", "sign in" and "sign out". Two layers gate protected pages:
//!
//! - [`guard`]: request-level redirects based on session presence and path
//! - [`admin`]: per-render admin role check inside admin page handlers
//!
//! Both layers stay in place even though their session checks overlap. The
//! guard has no access to roles.

pub mod admin;
pub mod guard;
mod memory;
mod session;
mod supabase;

pub use admin::{admin_gate, AdminAccess};
pub use guard::{evaluate, guard_middleware, GuardConfig, GuardDecision};
pub use memory::MemoryAuth;
pub use session::{clear_session, session_cookie, token_from_jar, Session, SESSION_COOKIE};
pub use supabase::{SupabaseAuth, SupabaseAuthConfig};

use async_trait::async_trait;
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;

/// Hosted authentication provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Short provider name for health output
    fn name(&self) -> &'static str;

    /// Resolve an access token to its session, `None` when the provider does
    /// not recognise it
    async fn current_session(&self, access_token: &str) -> Result<Option<Session>, AuthError>;

    /// Email/password sign in
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Session, AuthError>;

    /// Invalidate the session at the provider
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}

/// Admin role lookup, fetched fresh on every admin render
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn is_admin(&self, session: &Session) -> Result<bool, AuthError>;
}

/// Errors from the auth provider or role lookup
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Auth provider unavailable")]
    Unavailable,

    #[error("Auth request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Auth provider error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Role lookup failed: {0}")]
    RoleLookup(String),
}

impl AuthError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout
        } else if err.is_connect() {
            AuthError::Unavailable
        } else {
            AuthError::Request(err)
        }
    }
}

/// Session for the request's cookie, if the provider recognises it.
///
/// Provider failures count as "no session" and are logged.
pub async fn session_from_jar(provider: &dyn AuthProvider, jar: &CookieJar) -> Option<Session> {
    let token = token_from_jar(jar)?;
    match provider.current_session(&token).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(provider = provider.name(), error = %e, "Session lookup failed");
            None
        }
    }
}
