// Database module - provides data access layer

use color_eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

// Re-export row models for convenience
pub mod models;
pub use models::*;

// Internal modules
mod access_code;
mod admin;
mod question;
mod schema;

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        // Verify connection
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(one, 1);

        // Initialize schema
        schema::create_schema(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }

    /// Pool that connects on first use. Router tests use this to exercise
    /// paths that never reach the database.
    pub fn new_lazy(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(url)?;
        Ok(Self { pool })
    }
}
