//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::auth::{AuthProvider, GuardConfig, RoleDirectory};
use crate::config::{EmailConfig, SiteConfig};
use crate::email::EmailSender;
use crate::store::QuoteStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Quote persistence
    pub quotes: Arc<dyn QuoteStore>,
    /// Admin role lookup
    pub roles: Arc<dyn RoleDirectory>,
    /// Hosted auth provider
    pub auth: Arc<dyn AuthProvider>,
    /// Transactional email provider
    pub email: Arc<dyn EmailSender>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Routing guard paths
    pub guard: Arc<GuardConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        quotes: Arc<dyn QuoteStore>,
        roles: Arc<dyn RoleDirectory>,
        auth: Arc<dyn AuthProvider>,
        email: Arc<dyn EmailSender>,
        config: ApiConfig,
    ) -> Self {
        Self {
            quotes,
            roles,
            auth,
            email,
            config: Arc::new(config),
            guard: Arc::new(GuardConfig::default()),
            start_time: Instant::now(),
        }
    }

    /// Replace the default guard paths
    pub fn with_guard(mut self, guard: GuardConfig) -> Self {
        self.guard = Arc::new(guard);
        self
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty allows any
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    /// Quotes shown on dashboard and admin overview
    pub recent_quotes_limit: usize,
    /// Sender and recipients for quote notifications
    pub email: EmailConfig,
    /// Public site identifiers
    pub site: SiteConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            max_body_size: 64 * 1024, // 64KB
            cookie_secure: true,
            recent_quotes_limit: 25,
            email: EmailConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Build from the file/environment configuration
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            cors_origins: config.api.cors_origins.clone(),
            cookie_secure: config.api.cookie_secure,
            recent_quotes_limit: config.api.recent_quotes_limit,
            email: config.email.clone(),
            site: config.site.clone(),
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
