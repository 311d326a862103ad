use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

/// Connect to `url`. In-memory SQLite is pinned to a single pooled
/// connection, otherwise every pooled connection would see its own database.
pub async fn connect_url(url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(url.to_string());
    if url.starts_with("sqlite::memory:") {
        opts.max_connections(1).min_connections(1);
    }
    opts.sqlx_logging(false);
    let db = Database::connect(opts).await?;
    info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}
