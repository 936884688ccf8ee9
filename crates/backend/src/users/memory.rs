use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use shared_types::User;
use tokio::sync::RwLock;

use super::{NewUser, UserStore};

/// In-process user store, used when no database is configured.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, pk: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(pk).cloned())
    }

    async fn get_or_create(&self, new_user: NewUser) -> anyhow::Result<User> {
        let pk = new_user.pk();
        let mut users = self.users.write().await;

        let user = users.entry(pk.clone()).or_insert_with(|| {
            tracing::info!("Creating new user {}", pk);
            User {
                pk,
                sub: new_user.sub,
                provider: new_user.provider.as_str().to_string(),
                email: new_user.email,
                name: new_user.name,
                created_at: Utc::now(),
            }
        });

        Ok(user.clone())
    }
}
