//! Quote Persistence
//!
//! Capability trait over the hosted relational store plus two
//! implementations:
//!
//! - [`SupabaseStore`]: PostgREST client for the hosted database
//! - [`MemoryStore`]: in-process store for tests and local development
//!
//! Inserts are not idempotent. A caller that retries after a network error
//! can create duplicate rows.

mod error;
mod memory;
mod supabase;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use supabase::{SupabaseStore, SupabaseStoreConfig};

use async_trait::async_trait;

use crate::auth::Session;
use crate::quote::{QuoteFormData, QuoteRecord};

/// Persistence operations for quote requests
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Short backend name for health output
    fn name(&self) -> &'static str;

    /// Insert one quote request, stamping `created_at`.
    ///
    /// Returns the inserted rows. Failures are logged and returned as-is.
    async fn insert_quote(&self, form: &QuoteFormData) -> StoreResult<Vec<QuoteRecord>>;

    /// Newest quote requests first, visible to the given session
    async fn recent_quotes(&self, session: &Session, limit: usize)
        -> StoreResult<Vec<QuoteRecord>>;

    /// Total quote requests visible to the given session
    async fn count_quotes(&self, session: &Session) -> StoreResult<usize>;

    /// Reachability check backing the readiness endpoint
    async fn check_health(&self) -> StoreResult<()>;
}
