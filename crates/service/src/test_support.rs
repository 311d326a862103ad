#![cfg(test)]
use migration::MigratorTrait;

use crate::storage::SeaOrmEmailStore;

/// SeaORM store over a private in-memory SQLite database with migrations applied.
pub async fn sqlite_store() -> Result<SeaOrmEmailStore, anyhow::Error> {
    let db = models::db::connect_url("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(SeaOrmEmailStore::new(db))
}
