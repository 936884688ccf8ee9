use diesel::prelude::*;
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager, ManagerConfig},
    AsyncPgConnection, RunQueryDsl,
};
use shared_types::User;

use crate::models::NewUserRow;

pub type DbPool = Pool<AsyncPgConnection>;

async fn establish_tls_connection(config: String) -> diesel::ConnectionResult<AsyncPgConnection> {
    // Set up rustls TLS configuration
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

    let (client, connection) = tokio_postgres::connect(&config, tls)
        .await
        .map_err(|e| diesel::ConnectionError::BadConnection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("Connection error: {}", e);
        }
    });

    AsyncPgConnection::try_from(client).await
}

pub fn establish_connection_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let mut manager_config = ManagerConfig::default();
    manager_config.custom_setup =
        Box::new(|url| Box::pin(establish_tls_connection(url.to_string())));

    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
        database_url,
        manager_config,
    );
    let pool = Pool::builder(config).build()?;

    Ok(pool)
}

// User database operations
pub mod users {
    use super::*;

    pub async fn get_by_pk(
        conn: &mut AsyncPgConnection,
        key: &str,
    ) -> anyhow::Result<Option<User>> {
        use crate::schema::users::dsl::*;

        let user = users
            .filter(pk.eq(key))
            .first::<User>(conn)
            .await
            .optional()?;

        Ok(user)
    }

    /// Insert the row unless a user with the same key exists.
    ///
    /// Returns whether a row was written.
    pub async fn insert_if_absent(
        conn: &mut AsyncPgConnection,
        row: &NewUserRow,
    ) -> anyhow::Result<bool> {
        use crate::schema::users::dsl::*;

        let inserted = diesel::insert_into(users)
            .values(row)
            .on_conflict(pk)
            .do_nothing()
            .execute(conn)
            .await?;

        Ok(inserted > 0)
    }
}
