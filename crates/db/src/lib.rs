//! Persistence gateway for users, collections, rights, and tasks.
//!
//! The services talk to storage only through the store traits in [`store`].
//! Two implementations are provided:
//!
//! - [`pg::PgStore`] -- PostgreSQL via sqlx, built on the zero-sized
//!   repositories in [`repositories`].
//! - [`memory::MemoryStore`] -- an in-process store with the same semantics
//!   (cascades, unique constraints, listing order), used by tests and local runs.

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use error::{DbError, DbResult};
pub use store::{CollectionStore, Gateway, RightsStore, TaskStore, UserStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    tracing::debug!(max_connections, "Opening database pool");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
