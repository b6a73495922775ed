use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::user::errors::UserError;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::ports::UserRepository;

/// In-process user store for tests and single-instance deployments.
///
/// The email uniqueness check and the insert happen under one write
/// guard, so concurrent creates for the same email cannot both succeed.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    by_email: HashMap<String, User>,
    // Emails in insertion order, backing list_all.
    order: Vec<String>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut store = self.inner.write().await;

        let email = user.email.as_str().to_string();
        if store.by_email.contains_key(&email) {
            return Err(UserError::AlreadyRegistered(email));
        }

        store.order.push(email.clone());
        store.by_email.insert(email, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let store = self.inner.read().await;
        Ok(store.by_email.values().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let store = self.inner.read().await;
        Ok(store.by_email.get(email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let store = self.inner.read().await;
        Ok(store
            .order
            .iter()
            .filter_map(|email| store.by_email.get(email).cloned())
            .collect())
    }
}
