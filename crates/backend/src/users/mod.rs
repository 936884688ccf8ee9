//! Get-or-create persistence for users who complete a login.

mod memory;
mod postgres;

use async_trait::async_trait;
use shared_types::{Provider, User};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Identity facts used to create a user on first login
#[derive(Debug, Clone)]
pub struct NewUser {
    pub sub: String,
    pub provider: Provider,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl NewUser {
    pub fn pk(&self) -> String {
        User::key_for(&self.sub)
    }
}

/// Storage for user records keyed by `USER#<sub>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by partition key.
    async fn get(&self, pk: &str) -> anyhow::Result<Option<User>>;

    /// Return the stored user for `new_user.sub`, creating it if absent.
    ///
    /// An existing record is returned unchanged.
    async fn get_or_create(&self, new_user: NewUser) -> anyhow::Result<User>;
}
