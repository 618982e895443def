//! SQLite-backed repository implementations.

mod articles;
mod categories;
mod util;

pub use util::map_sqlx_error;

use std::str::FromStr;
use std::sync::Arc;

use sqlx::{
    query,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};

#[derive(Clone)]
pub struct SqliteRepositories {
    pool: Arc<SqlitePool>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open a pool against `url`, creating the database file on first
    /// run. Foreign keys are enforced on every connection; the article
    /// to category reference depends on it.
    pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
    }

    pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }
}
