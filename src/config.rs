//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::GuardConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub supabase: SupabaseConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub guard: GuardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Mark the session cookie `Secure`
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,

    /// Quotes shown on the dashboard and admin overview
    #[serde(default = "default_recent_limit")]
    pub recent_quotes_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    10
}

fn default_cookie_secure() -> bool {
    true
}

fn default_recent_limit() -> usize {
    25
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
            cookie_secure: default_cookie_secure(),
            recent_quotes_limit: default_recent_limit(),
        }
    }
}

impl ApiConfig {
    /// Provider client timeout; saturates instead of overflowing
    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout_secs.saturating_mul(1000)
    }
}

/// Hosted database and auth provider
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,

    pub anon_key: Option<String>,

    #[serde(default = "default_quotes_table")]
    pub quotes_table: String,

    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,
}

fn default_quotes_table() -> String {
    "quote_requests".to_string()
}

fn default_profiles_table() -> String {
    "profiles".to_string()
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            quotes_table: default_quotes_table(),
            profiles_table: default_profiles_table(),
        }
    }
}

/// Transactional email provider
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub resend_api_key: Option<String>,

    #[serde(default = "default_resend_url")]
    pub base_url: String,

    #[serde(default = "default_from")]
    pub from: String,

    /// Inbox receiving quote notifications
    #[serde(default = "default_notify_to")]
    pub notify_to: Vec<String>,
}

fn default_resend_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from() -> String {
    "Coverwise Quotes <quotes@coverwise.com>".to_string()
}

fn default_notify_to() -> Vec<String> {
    vec!["agents@coverwise.com".to_string()]
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            base_url: default_resend_url(),
            from: default_from(),
            notify_to: default_notify_to(),
        }
    }
}

/// Public identifiers handed to the front end. Never secrets.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub struct SiteConfig {
    pub gtm_id: Option<String>,
    pub ga_measurement_id: Option<String>,
    pub calendly_url: Option<String>,
    pub hubspot_portal_id: Option<String>,
    pub hubspot_form_id: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("coverwise").join("config.toml")),
            Some(PathBuf::from("/etc/coverwise/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check that the values the hosted providers need are present.
    ///
    /// Called once at startup; a failure is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require(&self.supabase.url, "supabase.url", "SUPABASE_URL")?;
        require(&self.supabase.anon_key, "supabase.anon_key", "SUPABASE_ANON_KEY")?;
        require(&self.email.resend_api_key, "email.resend_api_key", "RESEND_API_KEY")?;
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(host) = std::env::var("COVERWISE_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("COVERWISE_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Provider overrides
        override_opt(&mut self.supabase.url, "SUPABASE_URL");
        override_opt(&mut self.supabase.anon_key, "SUPABASE_ANON_KEY");
        override_opt(&mut self.email.resend_api_key, "RESEND_API_KEY");
        if let Ok(from) = std::env::var("EMAIL_FROM") {
            self.email.from = from;
        }
        if let Ok(to) = std::env::var("EMAIL_TO") {
            self.email.notify_to = to
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Site identifiers
        override_opt(&mut self.site.gtm_id, "GTM_ID");
        override_opt(&mut self.site.ga_measurement_id, "GA_MEASUREMENT_ID");
        override_opt(&mut self.site.calendly_url, "CALENDLY_URL");
        override_opt(&mut self.site.hubspot_portal_id, "HUBSPOT_PORTAL_ID");
        override_opt(&mut self.site.hubspot_form_id, "HUBSPOT_FORM_ID");

        // Logging overrides
        if let Ok(level) = std::env::var("COVERWISE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("COVERWISE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn override_opt(slot: &mut Option<String>, var: &str) {
    if let Ok(value) = std::env::var(var) {
        if !value.trim().is_empty() {
            *slot = Some(value);
        }
    }
}

fn require(value: &Option<String>, key: &'static str, env: &'static str) -> Result<(), ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::Missing { key, env }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Missing required configuration {key} (set {env})")]
    Missing { key: &'static str, env: &'static str },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Coverwise Configuration
#
# Environment variables override these settings:
# - COVERWISE_API_HOST, COVERWISE_API_PORT
# - SUPABASE_URL, SUPABASE_ANON_KEY
# - RESEND_API_KEY, EMAIL_FROM, EMAIL_TO (comma-separated)
# - GTM_ID, GA_MEASUREMENT_ID, CALENDLY_URL, HUBSPOT_PORTAL_ID, HUBSPOT_FORM_ID
# - COVERWISE_LOG_LEVEL, COVERWISE_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8080

# Allowed CORS origins
cors_origins = ["http://localhost:3000", "http://127.0.0.1:3000"]

# Provider request timeout in seconds
request_timeout_secs = 10

# Send the session cookie only over HTTPS
cookie_secure = true

# Quotes listed on the dashboard and admin overview
recent_quotes_limit = 25

[supabase]
# Project URL and public anon key (required)
# url = "https://your-project.supabase.co"
# anon_key = ""

quotes_table = "quote_requests"
profiles_table = "profiles"

[email]
# Resend API key (required)
# resend_api_key = ""

from = "Coverwise Quotes <quotes@coverwise.com>"
notify_to = ["agents@coverwise.com"]

[site]
# Public identifiers exposed at GET /api/site
# gtm_id = ""
# ga_measurement_id = ""
# calendly_url = ""
# hubspot_portal_id = ""
# hubspot_form_id = ""

[guard]
dashboard_prefix = "/dashboard"
login_path = "/login"
signed_in_redirects = ["/login", "/signup"]
admin_prefix = "/admin"
admin_login_path = "/admin/login"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
