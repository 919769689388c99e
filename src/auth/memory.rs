//! In-memory auth provider for tests and local development

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthError, AuthProvider, Session};

struct Account {
    user_id: String,
    password: String,
}

/// Issues random tokens and keeps live sessions in a map
#[derive(Default)]
pub struct MemoryAuth {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account and return its user id
    pub async fn register(&self, email: &str, password: &str) -> String {
        let user_id = Uuid::new_v4().to_string();
        self.accounts.write().await.insert(
            email.to_lowercase(),
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        user_id
    }

    /// Open a session directly, bypassing credentials
    pub async fn issue_session(&self, user_id: &str, email: Option<&str>) -> Session {
        let session = Session::new(
            Uuid::new_v4().simple().to_string(),
            user_id,
            email.map(str::to_string),
        );
        self.sessions
            .write()
            .await
            .insert(session.access_token.clone(), session.clone());
        session
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn current_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.read().await.get(access_token).cloned())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let user_id = {
            let accounts = self.accounts.read().await;
            match accounts.get(&email.to_lowercase()) {
                Some(account) if account.password == password => account.user_id.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };

        Ok(self.issue_session(&user_id, Some(email)).await)
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        self.sessions.write().await.remove(&session.access_token);
        Ok(())
    }
}
