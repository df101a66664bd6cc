use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod slug;

use error::Result;

/// Shared handle on the racing database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Database for tests that need Postgres, taken from `DATABASE_URL`.
/// `None` when the variable is unset so those tests are skipped.
#[cfg(test)]
pub(crate) async fn test_database() -> Option<Database> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = Database::with_max_connections(&url, 2).await.unwrap();
    db.run_migrations().await.unwrap();

    Some(db)
}
