use async_trait::async_trait;
use shared_types::User;

use crate::db::{self, DbPool};
use crate::models::NewUserRow;

use super::{NewUser, UserStore};

/// User store backed by the `users` table.
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, pk: &str) -> anyhow::Result<Option<User>> {
        let mut conn = self.pool.get().await?;
        db::users::get_by_pk(&mut conn, pk).await
    }

    async fn get_or_create(&self, new_user: NewUser) -> anyhow::Result<User> {
        let mut conn = self.pool.get().await?;
        let row = NewUserRow::from(&new_user);

        if db::users::insert_if_absent(&mut conn, &row).await? {
            tracing::info!("Created new user {}", row.pk);
        }

        db::users::get_by_pk(&mut conn, &row.pk)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user {} missing after insert", row.pk))
    }
}
