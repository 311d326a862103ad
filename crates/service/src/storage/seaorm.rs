use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use common::EmailEntry;
use models::email;

use crate::errors::StoreError;
use crate::pagination::BatchQuery;
use crate::storage::EmailStore;

/// SeaORM-backed store over the `emails` table.
pub struct SeaOrmEmailStore {
    pub db: DatabaseConnection,
}

impl SeaOrmEmailStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl EmailStore for SeaOrmEmailStore {
    async fn create_email(&self, addr: &str) -> Result<(), StoreError> {
        email::create(&self.db, addr).await?;
        Ok(())
    }

    async fn get_email(&self, addr: &str) -> Result<Option<EmailEntry>, StoreError> {
        let found = email::get(&self.db, addr).await?;
        Ok(found.map(EmailEntry::from))
    }

    async fn get_email_batch(&self, query: BatchQuery) -> Result<Vec<EmailEntry>, StoreError> {
        let page = email::get_batch(&self.db, query.limit(), query.page_index()).await?;
        Ok(page.into_iter().map(EmailEntry::from).collect())
    }

    async fn update_email(&self, entry: &EmailEntry) -> Result<(), StoreError> {
        email::update(&self.db, &entry.email, entry.confirmed_at).await?;
        Ok(())
    }

    async fn delete_email(&self, addr: &str) -> Result<(), StoreError> {
        email::delete(&self.db, addr).await?;
        Ok(())
    }
}
