//! Coverwise API Server
//!
//! Run with: cargo run --bin coverwise
//!
//! # Configuration
//!
//! Settings come from `--config <path>` or the default locations, then the
//! environment:
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY`: hosted database and auth (required)
//! - `RESEND_API_KEY`: email provider key (required)
//! - `EMAIL_FROM`, `EMAIL_TO`: notification sender and recipients
//! - `COVERWISE_API_HOST`, `COVERWISE_API_PORT`: bind address
//! - `COVERWISE_LOG_LEVEL`, `COVERWISE_LOG_FORMAT`: logging (`RUST_LOG` wins)
//!
//! `--in-memory` runs against in-process fakes and skips the provider checks.
//! `COVERWISE_DEV_ADMIN_EMAIL` and `COVERWISE_DEV_ADMIN_PASSWORD` then seed
//! an admin account.

use anyhow::Context;
use clap::Parser;
use coverwise::api::{serve, ApiConfig, AppState};
use coverwise::auth::{AuthProvider, MemoryAuth, RoleDirectory, SupabaseAuth, SupabaseAuthConfig};
use coverwise::config::{Config, LoggingConfig};
use coverwise::email::{EmailSender, OutboxSender, ResendClient, ResendConfig};
use coverwise::store::{MemoryStore, QuoteStore, SupabaseStore, SupabaseStoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "coverwise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Coverwise quote intake and agent portal server")]
struct Args {
    /// Config file (default: standard locations, then environment only)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use in-memory store, auth and outbox instead of hosted providers
    #[arg(long)]
    in_memory: bool,
}

/// Providers the server runs against
struct Backends {
    quotes: Arc<dyn QuoteStore>,
    roles: Arc<dyn RoleDirectory>,
    auth: Arc<dyn AuthProvider>,
    email: Arc<dyn EmailSender>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Coverwise API server v{}", env!("CARGO_PKG_VERSION"));

    let backends = if args.in_memory {
        tracing::warn!("Running with in-memory providers; nothing is persisted or delivered");
        in_memory_backends().await
    } else {
        config.validate().context("invalid configuration")?;
        hosted_backends(&config)?
    };

    tracing::info!(
        store = backends.quotes.name(),
        auth = backends.auth.name(),
        email = backends.email.name(),
        "Providers ready"
    );

    let api_config = ApiConfig::from_config(&config);
    let state = AppState::new(
        backends.quotes,
        backends.roles,
        backends.auth,
        backends.email,
        api_config.clone(),
    )
    .with_guard(config.guard.clone());

    serve(state, &api_config).await?;

    tracing::info!("Coverwise API server stopped");
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("coverwise={},tower_http={}", logging.level, logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn hosted_backends(config: &Config) -> anyhow::Result<Backends> {
    let url = config.supabase.url.clone().unwrap_or_default();
    let anon_key = config.supabase.anon_key.clone().unwrap_or_default();
    let timeout_ms = config.api.request_timeout_ms();

    let mut store_config = SupabaseStoreConfig::new(url.clone(), anon_key.clone());
    store_config.quotes_table = config.supabase.quotes_table.clone();
    store_config.profiles_table = config.supabase.profiles_table.clone();
    store_config.request_timeout_ms = timeout_ms;
    let store = Arc::new(SupabaseStore::new(store_config).context("building store client")?);

    let mut auth_config = SupabaseAuthConfig::new(url, anon_key);
    auth_config.request_timeout_ms = timeout_ms;
    let auth = SupabaseAuth::new(auth_config).context("building auth client")?;

    let mut email_config = ResendConfig::new(config.email.resend_api_key.clone().unwrap_or_default());
    email_config.base_url = config.email.base_url.clone();
    email_config.request_timeout_ms = timeout_ms;
    let email = ResendClient::new(email_config).context("building email client")?;

    Ok(Backends {
        quotes: store.clone(),
        roles: store,
        auth: Arc::new(auth),
        email: Arc::new(email),
    })
}

async fn in_memory_backends() -> Backends {
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(MemoryAuth::new());

    let admin_email = std::env::var("COVERWISE_DEV_ADMIN_EMAIL").ok();
    let admin_password = std::env::var("COVERWISE_DEV_ADMIN_PASSWORD").ok();
    if let (Some(email), Some(password)) = (admin_email, admin_password) {
        let user_id = auth.register(&email, &password).await;
        store.grant_admin(user_id).await;
        tracing::info!(email = %email, "Seeded development admin");
    }

    Backends {
        quotes: store.clone(),
        roles: store,
        auth,
        email: Arc::new(OutboxSender::new()),
    }
}
