//! In-memory store
//!
//! Holds quote records and admin grants in process. Used by the router tests
//! and by `coverwise --in-memory` for local development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{QuoteStore, StoreError, StoreResult};
use crate::auth::{AuthError, RoleDirectory, Session};
use crate::quote::{QuoteFormData, QuoteRecord};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<QuoteRecord>>,
    admins: RwLock<HashSet<String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give a user the admin role
    pub async fn grant_admin(&self, user_id: impl Into<String>) {
        self.admins.write().await.insert(user_id.into());
    }

    /// Make subsequent inserts and health checks fail as if the store were down
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every stored record, oldest first
    pub async fn records(&self) -> Vec<QuoteRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_quote(&self, form: &QuoteFormData) -> StoreResult<Vec<QuoteRecord>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            let err = StoreError::Unavailable;
            tracing::error!(error = %err, "Failed to insert quote request");
            return Err(err);
        }

        let record = QuoteRecord {
            id: Uuid::new_v4(),
            row: form.to_row(Utc::now()),
        };

        self.records.write().await.push(record.clone());
        tracing::debug!(id = %record.id, "Stored quote request in memory");

        Ok(vec![record])
    }

    async fn recent_quotes(
        &self,
        _session: &Session,
        limit: usize,
    ) -> StoreResult<Vec<QuoteRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn count_quotes(&self, _session: &Session) -> StoreResult<usize> {
        Ok(self.records.read().await.len())
    }

    async fn check_health(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for MemoryStore {
    async fn is_admin(&self, session: &Session) -> Result<bool, AuthError> {
        Ok(self.admins.read().await.contains(&session.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{Gender, HealthStatus, TermLength};
    use chrono::NaiveDate;

    fn session(user_id: &str) -> Session {
        Session::new("token", user_id, None)
    }

    fn full_form() -> QuoteFormData {
        QuoteFormData {
            gender: Some(Gender::Male),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 11, 30),
            health_status: Some(HealthStatus::Excellent),
            coverage_amount: Some(1_000_000.0),
            term_length: Some(TermLength::Ten),
            first_name: Some("Lee".to_string()),
            last_name: Some("Park".to_string()),
            email: Some("lee@example.com".to_string()),
            phone: Some("555-0111".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_persists_all_columns() {
        let store = MemoryStore::new();
        let form = full_form();

        let inserted = store.insert_quote(&form).await.unwrap();
        assert_eq!(inserted.len(), 1);

        let stored = &store.records().await[0];
        assert_eq!(stored, &inserted[0]);

        let row = serde_json::to_value(stored).unwrap();
        assert_eq!(row["gender"], "male");
        assert_eq!(row["date_of_birth"], "1975-11-30");
        assert_eq!(row["health_status"], "excellent");
        assert_eq!(row["coverage_amount"], 1_000_000.0);
        assert_eq!(row["term_length"], 10);
        assert_eq!(row["first_name"], "Lee");
        assert_eq!(row["last_name"], "Park");
        assert_eq!(row["email"], "lee@example.com");
        assert_eq!(row["phone"], "555-0111");
        assert!(!row["created_at"].is_null());
        assert!(!row["id"].is_null());
    }

    #[tokio::test]
    async fn test_partial_form_is_accepted() {
        let store = MemoryStore::new();
        let form = QuoteFormData {
            email: Some("only@example.com".to_string()),
            ..Default::default()
        };

        let inserted = store.insert_quote(&form).await.unwrap();
        assert_eq!(inserted[0].row.email.as_deref(), Some("only@example.com"));
        assert!(inserted[0].row.gender.is_none());
    }

    #[tokio::test]
    async fn test_retry_creates_duplicates() {
        let store = MemoryStore::new();
        let form = full_form();

        store.insert_quote(&form).await.unwrap();
        store.insert_quote(&form).await.unwrap();

        let records = store.records().await;
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }

    #[tokio::test]
    async fn test_failed_write_is_returned() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let result = store.insert_quote(&full_form()).await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
        assert!(store.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_recent_quotes_newest_first() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            let form = QuoteFormData {
                first_name: Some(name.to_string()),
                ..Default::default()
            };
            store.insert_quote(&form).await.unwrap();
        }

        let recent = store.recent_quotes(&session("u1"), 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].row.first_name.as_deref(), Some("c"));
        assert_eq!(recent[1].row.first_name.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_count_is_not_capped_by_recent_limit() {
        let store = MemoryStore::new();
        for _ in 0..30 {
            store.insert_quote(&full_form()).await.unwrap();
        }

        assert_eq!(store.recent_quotes(&session("u1"), 25).await.unwrap().len(), 25);
        assert_eq!(store.count_quotes(&session("u1")).await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_health_follows_failure_switch() {
        let store = MemoryStore::new();
        assert!(store.check_health().await.is_ok());

        store.set_fail_writes(true);
        assert!(matches!(store.check_health().await, Err(StoreError::Unavailable)));
    }

    #[tokio::test]
    async fn test_admin_grants() {
        let store = MemoryStore::new();
        store.grant_admin("boss").await;

        assert!(store.is_admin(&session("boss")).await.unwrap());
        assert!(!store.is_admin(&session("agent")).await.unwrap());
    }
}
