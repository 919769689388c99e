//! # Coverwise
//!
//! Backend for a life insurance quote comparison site: the multi-step quote
//! wizard, quote persistence, agency email notifications, agent and admin
//! access control, and blog presentation lookups.
//!
//! ## Modules
//!
//! - [`quote`]: Quote form data and the wizard state container
//! - [`store`]: Quote persistence over the hosted database
//! - [`email`]: Quote notification email and provider client
//! - [`auth`]: Sessions, the routing guard and the admin gate
//! - [`content`]: Blog category icon and image lookups
//! - [`api`]: HTTP server with Axum
//! - [`config`]: File and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coverwise::quote::{Gender, StepInput, WizardState};
//! use coverwise::store::{MemoryStore, QuoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut wizard = WizardState::new();
//!     wizard.apply(StepInput::Gender(Gender::Female));
//!     wizard.apply(StepInput::CoverageAmount(500_000.0));
//!
//!     let store = MemoryStore::new();
//!     let records = store.insert_quote(&wizard.into_submission()).await?;
//!
//!     println!("Stored quote {}", records[0].id);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod email;
pub mod quote;
pub mod store;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use auth::{
    admin_gate, AdminAccess, AuthError, AuthProvider, GuardConfig, GuardDecision, MemoryAuth,
    RoleDirectory, Session, SupabaseAuth, SupabaseAuthConfig,
};

pub use config::{Config, ConfigError, LoggingConfig};

pub use content::{category_icon, category_image, BlogCategory};

pub use email::{
    EmailError, EmailMessage, EmailReceipt, EmailSender, OutboxSender, ProviderError,
    ResendClient, ResendConfig,
};

pub use quote::{
    Gender, HealthStatus, Progress, QuoteFormData, QuoteRecord, QuoteStep, TermLength,
    WizardState,
};

pub use store::{MemoryStore, QuoteStore, StoreError, StoreResult, SupabaseStore, SupabaseStoreConfig};
