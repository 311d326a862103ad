//! Storage contract consumed by both transports
//!
//! Five keyed operations against the email address. Implementations must be
//! safe for concurrent callers; the gateway adds no locking of its own.

use async_trait::async_trait;

use common::EmailEntry;

use crate::errors::StoreError;
use crate::pagination::BatchQuery;

pub mod memory;
pub mod seaorm;

pub use memory::MemoryEmailStore;
pub use seaorm::SeaOrmEmailStore;

#[async_trait]
pub trait EmailStore: Send + Sync {
    /// Insert an unconfirmed entry; `Conflict` if the key already exists.
    async fn create_email(&self, email: &str) -> Result<(), StoreError>;
    /// `Ok(None)` when no entry has this key.
    async fn get_email(&self, email: &str) -> Result<Option<EmailEntry>, StoreError>;
    /// One page in ascending address order. `query` is already validated.
    async fn get_email_batch(&self, query: BatchQuery) -> Result<Vec<EmailEntry>, StoreError>;
    /// Overwrite the mutable fields of the entry with `entry.email`; `NotFound` if absent.
    async fn update_email(&self, entry: &EmailEntry) -> Result<(), StoreError>;
    /// Remove the entry. Removing an absent key succeeds.
    async fn delete_email(&self, email: &str) -> Result<(), StoreError>;
}
